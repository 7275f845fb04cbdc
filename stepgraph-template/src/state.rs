//! Run state of the template machine.

use crate::error::TemplateError;
use stepgraph_core::{FallibleState, TextCursor};

/// State threaded through one render.
///
/// `buffers[0]` collects the output. While an argument reference is being
/// read, its digits collect in a second buffer pushed on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateState {
    buffers: Vec<String>,
    cursor: usize,
    args: Vec<String>,
    escaped: bool,
    error: Option<TemplateError>,
}

impl TemplateState {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            buffers: vec![String::new()],
            cursor: 0,
            args,
            escaped: false,
            error: None,
        }
    }

    /// Text rendered so far.
    pub fn output(&self) -> &str {
        self.buffers.first().map_or("", String::as_str)
    }

    pub fn output_len(&self) -> usize {
        self.output().len()
    }

    pub fn into_output(mut self) -> String {
        if self.buffers.is_empty() {
            String::new()
        } else {
            self.buffers.swap_remove(0)
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn is_escaped(&self) -> bool {
        self.escaped
    }

    pub(crate) fn set_escaped(&mut self, escaped: bool) {
        self.escaped = escaped;
    }

    pub(crate) fn push_output(&mut self, c: char) {
        if let Some(root) = self.buffers.first_mut() {
            root.push(c);
        }
    }

    pub(crate) fn begin_argument(&mut self) {
        self.buffers.push(String::new());
    }

    pub(crate) fn end_argument(&mut self) {
        if self.buffers.len() > 1 {
            self.buffers.pop();
        }
    }

    pub(crate) fn push_argument(&mut self, c: char) {
        if self.buffers.len() > 1 {
            if let Some(top) = self.buffers.last_mut() {
                top.push(c);
            }
        }
    }

    /// Digits of the argument reference being read.
    pub(crate) fn argument_text(&self) -> &str {
        if self.buffers.len() > 1 {
            self.buffers.last().map_or("", String::as_str)
        } else {
            ""
        }
    }

    /// Appends argument `index` to the output. Returns false if there is no
    /// such argument.
    pub(crate) fn substitute(&mut self, index: usize) -> bool {
        match self.args.get(index) {
            Some(value) => {
                if let Some(root) = self.buffers.first_mut() {
                    root.push_str(value);
                }
                true
            }
            None => false,
        }
    }
}

impl TextCursor for TemplateState {
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }
}

impl FallibleState for TemplateState {
    type Error = TemplateError;

    fn error(&self) -> Option<&TemplateError> {
        self.error.as_ref()
    }

    fn set_error(&mut self, error: TemplateError) {
        self.error = Some(error);
    }

    fn take_error(&mut self) -> Option<TemplateError> {
        self.error.take()
    }

    fn create_error(&self, message: String) -> TemplateError {
        TemplateError::Syntax {
            position: self.cursor,
            message,
        }
    }
}
