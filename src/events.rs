//! Structured event log of an induction run.
//!
//! A log is a tree of named sections holding named entries. It is kept apart
//! from `tracing` so front ends can render or serialize a finished run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One recorded item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Entry { name: String, value: String },
    Section(Section),
}

/// A named, ordered group of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub events: Vec<Event>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            events: Vec::new(),
        }
    }

    /// Values of the entries called `name`, in recording order.
    pub fn entries<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.events.iter().filter_map(move |e| match e {
            Event::Entry { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// The first direct child section called `name`.
    pub fn child(&self, name: &str) -> Option<&Section> {
        self.children().find(|s| s.name == name)
    }

    pub fn children(&self) -> impl Iterator<Item = &Section> {
        self.events.iter().filter_map(|e| match e {
            Event::Section(s) => Some(s),
            Event::Entry { .. } => None,
        })
    }

    /// Names of the direct events, sections included.
    pub fn names(&self) -> Vec<&str> {
        self.events
            .iter()
            .map(|e| match e {
                Event::Entry { name, .. } => name.as_str(),
                Event::Section(s) => s.name.as_str(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        writeln!(f, "{}{}", pad, self.name)?;
        for event in &self.events {
            match event {
                Event::Entry { name, value } => {
                    let mut lines = value.lines();
                    writeln!(f, "{}  {}: {}", pad, name, lines.next().unwrap_or(""))?;
                    for line in lines {
                        writeln!(f, "{}    {}", pad, line)?;
                    }
                }
                Event::Section(s) => s.write_indented(f, depth + 1)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Builder for a [`Section`] tree.
///
/// A disabled log ignores every call, so callers record unconditionally.
#[derive(Debug, Clone)]
pub struct EventLog {
    enabled: bool,
    open: Vec<Section>,
}

impl EventLog {
    pub fn new(name: impl Into<String>) -> Self {
        EventLog {
            enabled: true,
            open: vec![Section::new(name)],
        }
    }

    pub fn disabled() -> Self {
        EventLog {
            enabled: false,
            open: vec![Section::default()],
        }
    }

    pub fn enabled(name: impl Into<String>, enabled: bool) -> Self {
        if enabled {
            EventLog::new(name)
        } else {
            EventLog::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an entry in the innermost open section.
    pub fn record(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        if self.enabled {
            self.push(Event::Entry {
                name: name.into(),
                value: value.to_string(),
            });
        }
    }

    /// Like [`EventLog::record`], building the value only when enabled.
    pub fn record_with(&mut self, name: impl Into<String>, value: impl FnOnce() -> String) {
        if self.enabled {
            self.push(Event::Entry {
                name: name.into(),
                value: value(),
            });
        }
    }

    pub fn begin_child(&mut self, name: impl Into<String>) {
        if self.enabled {
            self.open.push(Section::new(name));
        }
    }

    /// Close the innermost section. The root is never closed.
    pub fn end_child(&mut self) {
        if !self.enabled || self.open.len() < 2 {
            return;
        }
        if let Some(section) = self.open.pop() {
            self.push(Event::Section(section));
        }
    }

    /// Current nesting depth; 0 at the root.
    pub fn depth(&self) -> usize {
        self.open.len() - 1
    }

    /// Close all open sections and return the root.
    pub fn finish(mut self) -> Section {
        while self.open.len() > 1 {
            self.end_child();
        }
        self.open.pop().unwrap_or_default()
    }

    fn push(&mut self, event: Event) {
        if let Some(section) = self.open.last_mut() {
            section.events.push(event);
        }
    }
}
