//! Two independent validation passes over generated BPMN XML.
//!
//! 1. [check_well_formed]: the document is well-formed XML 1.0, has a `definitions` root and
//!    declares the BPMN model namespace.
//! 2. [check_structure]: every process holds at least one start and one end event, and every
//!    sequence flow has non-empty `sourceRef` and `targetRef`.
//!
//! Each pass returns the list of problems it found; empty means the pass succeeded.

use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use tracing::instrument;

use super::writer::BPMN_MODEL_NS;

fn in_model_ns(ns: &ResolveResult) -> bool {
  matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == BPMN_MODEL_NS.as_bytes())
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, String> {
  match e.try_get_attribute(name) {
    Ok(Some(attr)) => Ok(Some(String::from_utf8_lossy(&attr.value).into_owned())),
    Ok(None) => Ok(None),
    Err(err) => Err(format!("XML parsing error: {err}")),
  }
}

/// XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
  matches!(c,
    '\u{9}' | '\u{A}' | '\u{D}'
    | '\u{20}'..='\u{D7FF}'
    | '\u{E000}'..='\u{FFFD}'
    | '\u{10000}'..='\u{10FFFF}')
}

fn illegal_char(text: &str) -> Option<char> {
  text.chars().find(|c| !is_xml_char(*c))
}

/// Duplicate attributes, undefined entities and illegal characters in attribute values.
fn attribute_problems(e: &BytesStart<'_>, problems: &mut Vec<String>) {
  let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
  let mut attrs = e.attributes();
  attrs.with_checks(true);
  for attr in attrs {
    let attr = match attr {
      Ok(attr) => attr,
      Err(err) => {
        problems.push(format!("XML attribute error in <{tag}>: {err}"));
        return;
      }
    };
    let raw = String::from_utf8_lossy(&attr.value);
    match unescape(&raw) {
      Ok(value) => {
        if let Some(c) = illegal_char(&value) {
          problems.push(format!(
            "Illegal XML character U+{:04X} in attribute of <{tag}>",
            c as u32
          ));
        }
      }
      Err(err) => problems.push(format!("Invalid attribute value in <{tag}>: {err}")),
    }
  }
}

/// Only character references and the five predefined entities are defined in BPMN documents.
fn reference_problem(r: &BytesRef<'_>) -> Option<String> {
  if r.is_char_ref() {
    return match r.resolve_char_ref() {
      Ok(Some(c)) if !is_xml_char(c) => Some(format!(
        "Illegal XML character reference U+{:04X}",
        c as u32
      )),
      Ok(_) => None,
      Err(err) => Some(format!("Invalid character reference: {err}")),
    };
  }
  let name = String::from_utf8_lossy(r);
  match name.as_ref() {
    "lt" | "gt" | "amp" | "apos" | "quot" => None,
    other => Some(format!("Undefined entity &{other};")),
  }
}

fn outside_root(problems: &mut Vec<String>, what: &str) {
  let message = format!("{what} outside the root element");
  if !problems.contains(&message) {
    problems.push(message);
  }
}

/// Well-formedness and minimal structure.
///
/// Beyond what the event reader rejects, this checks for a single root element with nothing
/// but whitespace around it, unique attributes, defined entities and legal XML 1.0 characters.
#[instrument(level = "trace", skip(xml))]
pub fn check_well_formed(xml: &str) -> Vec<String> {
  let mut problems = Vec::new();
  if let Some(c) = illegal_char(xml) {
    problems.push(format!("Illegal XML character U+{:04X}", c as u32));
  }

  let mut reader = NsReader::from_str(xml);
  let mut depth: usize = 0;
  let mut saw_root = false;
  let mut root_closed = false;
  loop {
    let event = match reader.read_event() {
      Ok(event) => event,
      Err(e) => {
        problems.push(format!(
          "XML parsing error at position {}: {e}",
          reader.buffer_position()
        ));
        return problems;
      }
    };
    match event {
      Event::Start(e) => {
        if root_closed && depth == 0 {
          outside_root(&mut problems, "Element");
        }
        attribute_problems(&e, &mut problems);
        depth += 1;
        saw_root = true;
      }
      Event::Empty(e) => {
        if root_closed && depth == 0 {
          outside_root(&mut problems, "Element");
        }
        attribute_problems(&e, &mut problems);
        saw_root = true;
        if depth == 0 {
          root_closed = true;
        }
      }
      Event::End(_) => {
        depth = depth.saturating_sub(1);
        if depth == 0 {
          root_closed = true;
        }
      }
      Event::Text(t) if depth == 0 => {
        if !t.iter().all(u8::is_ascii_whitespace) {
          outside_root(&mut problems, "Text");
        }
      }
      Event::CData(_) if depth == 0 => outside_root(&mut problems, "Text"),
      Event::GeneralRef(r) => {
        if depth == 0 {
          outside_root(&mut problems, "Text");
        }
        if let Some(p) = reference_problem(&r) {
          problems.push(p);
        }
      }
      Event::Eof => break,
      _ => {}
    }
  }
  if !saw_root {
    problems.push("XML parsing error: no root element".to_string());
    return problems;
  }
  if depth > 0 {
    problems.push(format!("XML parsing error: {depth} unclosed element(s)"));
    return problems;
  }

  if !xml.contains("<definitions") {
    problems.push("Missing <definitions> root element".to_string());
  }
  if !xml.contains(BPMN_MODEL_NS) {
    problems.push("Missing BPMN namespace declaration".to_string());
  }
  problems
}

struct ProcessScope {
  id: String,
  depth: usize,
  starts: usize,
  ends: usize,
}

impl ProcessScope {
  fn report(&self, problems: &mut Vec<String>) {
    if self.starts == 0 {
      problems.push(format!("Process '{}' has no start event", self.id));
    }
    if self.ends == 0 {
      problems.push(format!("Process '{}' has no end event", self.id));
    }
  }
}

/// Structural soundness of every process and sequence flow in the BPMN model namespace.
#[instrument(level = "trace", skip(xml))]
pub fn check_structure(xml: &str) -> Vec<String> {
  let mut reader = NsReader::from_str(xml);
  let mut problems = Vec::new();
  let mut scopes: Vec<ProcessScope> = Vec::new();
  let mut depth: usize = 0;

  loop {
    let (ns, event) = match reader.read_resolved_event() {
      Ok(pair) => pair,
      Err(e) => {
        problems.push(format!("XML parsing error: {e}"));
        return problems;
      }
    };
    let (element, is_empty) = match &event {
      Event::Start(e) => {
        depth += 1;
        (e, false)
      }
      Event::Empty(e) => (e, true),
      Event::End(_) => {
        if scopes.last().is_some_and(|s| s.depth == depth) {
          if let Some(scope) = scopes.pop() {
            scope.report(&mut problems);
          }
        }
        depth = depth.saturating_sub(1);
        continue;
      }
      Event::Eof => break,
      _ => continue,
    };
    if !in_model_ns(&ns) {
      continue;
    }

    match element.local_name().as_ref() {
      b"process" => {
        let id = match attribute(element, "id") {
          Ok(id) => id.unwrap_or_else(|| "unknown".to_string()),
          Err(p) => {
            problems.push(p);
            continue;
          }
        };
        let scope = ProcessScope {
          id,
          depth,
          starts: 0,
          ends: 0,
        };
        if is_empty {
          scope.report(&mut problems);
        } else {
          scopes.push(scope);
        }
      }
      b"startEvent" => {
        if let Some(scope) = scopes.last_mut() {
          scope.starts += 1;
        }
      }
      b"endEvent" => {
        if let Some(scope) = scopes.last_mut() {
          scope.ends += 1;
        }
      }
      b"sequenceFlow" => {
        let flow_id = attribute(element, "id")
          .ok()
          .flatten()
          .unwrap_or_else(|| "unknown".to_string());
        for key in ["sourceRef", "targetRef"] {
          match attribute(element, key) {
            Ok(Some(v)) if !v.trim().is_empty() => {}
            Ok(_) => problems.push(format!("SequenceFlow '{flow_id}' missing {key}")),
            Err(p) => problems.push(p),
          }
        }
      }
      _ => {}
    }
  }

  for scope in scopes.drain(..).rev() {
    scope.report(&mut problems);
  }
  problems
}
