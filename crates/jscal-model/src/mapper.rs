//! JSON text boundary.
//!
//! Parsing turns text into a calendar object. Writing always runs
//! [`Value::pre_write`] over the whole tree first, so overrides are emitted
//! as patch objects.

use std::io::{Read, Write};

use jscal_core::config::{Settings, get_config};

use crate::error::ModelResult;
use crate::model::{Factory, Node, Value};

/// Reads and writes calendar objects as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mapper {
    pretty: bool,
}

impl Mapper {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            pretty: settings.output.pretty,
        }
    }

    /// Builds a mapper from the process-wide settings.
    #[must_use]
    pub fn from_config() -> Self {
        Self::new(get_config())
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Parses a calendar object from JSON text.
    ///
    /// ## Errors
    ///
    /// Returns `Json` if the text is not valid JSON, otherwise any error of
    /// [`Factory::make_calendar_object`].
    #[tracing::instrument(skip(self, input), fields(input_len = input.len()))]
    pub fn parse(&self, input: &str) -> ModelResult<Value> {
        tracing::debug!("Parsing calendar object");

        let node: Node = serde_json::from_str(input)?;
        Factory::global().make_calendar_object(node)
    }

    /// Parses a calendar object from a reader.
    ///
    /// ## Errors
    ///
    /// Returns `Json` if reading fails or the input is not valid JSON,
    /// otherwise any error of [`Factory::make_calendar_object`].
    #[tracing::instrument(skip_all)]
    pub fn parse_reader<R: Read>(&self, reader: R) -> ModelResult<Value> {
        let node: Node = serde_json::from_reader(reader)?;
        Factory::global().make_calendar_object(node)
    }

    /// Writes a value to `writer`, compact or indented per the settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if regenerating override patches fails, or `Json` if
    /// writing fails.
    #[tracing::instrument(skip_all, fields(type_name = value.type_name()))]
    pub fn write_value<W: Write>(&self, value: &mut Value, writer: W) -> ModelResult<()> {
        let node = value.write_node()?;
        if self.pretty {
            serde_json::to_writer_pretty(writer, &node)?;
        } else {
            serde_json::to_writer(writer, &node)?;
        }
        Ok(())
    }

    /// Writes a value to a string, compact or indented per the settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if regenerating override patches fails.
    pub fn write_value_as_string(&self, value: &mut Value) -> ModelResult<String> {
        let node = value.write_node()?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&node)?
        } else {
            serde_json::to_string(&node)?
        };

        tracing::trace!(len = text.len(), "Wrote calendar object");
        Ok(text)
    }

    /// Writes a value to an indented string regardless of the settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if regenerating override patches fails.
    pub fn write_value_as_string_formatted(&self, value: &mut Value) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(&value.write_node()?)?)
    }
}
