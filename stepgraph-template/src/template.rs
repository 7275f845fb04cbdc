//! The template machine.
//!
//! Three nodes:
//!
//! - `raw` (initial): copies characters to the output. The escape character
//!   makes the next character literal; `argument_start` moves to `argument`.
//! - `argument`: collects digits until `argument_end`, then appends the
//!   referenced argument and returns to `raw`. Entering pushes a scratch
//!   buffer for the digits; leaving pops it.
//! - `end`: terminal.
//!
//! Malformed input ends the run on `end` with the state's error slot set.
//! An escape character at the very end of the text has nothing to escape and
//! is dropped without an error.

use crate::error::TemplateError;
use crate::state::TemplateState;
use crate::syntax::{Limits, Syntax};
use stepgraph_core::{
    ExecutionContext, Graph, GraphBuilder, GraphSummary, NodeReference, RunError, TextCursor,
};

/// A compiled template machine for one syntax.
///
/// The graph is built once and can render any number of templates, from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Template {
    graph: Graph<TemplateState, str>,
    syntax: Syntax,
    limits: Limits,
    raw: NodeReference,
    argument: NodeReference,
    end: NodeReference,
}

impl Template {
    pub fn new(syntax: Syntax, limits: Limits) -> Result<Self, TemplateError> {
        syntax.validate()?;

        let Syntax {
            argument_start,
            argument_end,
            escape,
        } = syntax;

        let mut builder = GraphBuilder::<TemplateState, str>::new();
        let raw = builder.new_reference();
        let argument = builder.new_reference();
        let end = builder.new_reference();

        builder.define_node(raw, |n| {
            n.initial().char_step(
                move |_| end,
                move |ctx, c| {
                    if ctx.state.is_escaped() {
                        ctx.state.set_escaped(false);
                        ctx.state.push_output(c);
                        return ctx.id();
                    }
                    if c == escape {
                        ctx.state.set_escaped(true);
                        ctx.id()
                    } else if c == argument_start {
                        argument
                    } else {
                        ctx.state.push_output(c);
                        ctx.id()
                    }
                },
            );
        });

        builder.define_node(argument, |n| {
            n.enter(|ctx| ctx.state.begin_argument())
                .exit(|ctx| ctx.state.end_argument())
                .char_step(
                    move |ctx| ctx.fail(end, "unexpected end of input"),
                    move |ctx, c| {
                        if c == argument_end {
                            close_argument(ctx, raw, end)
                        } else if c.is_ascii_digit() {
                            ctx.state.push_argument(c);
                            ctx.id()
                        } else {
                            ctx.fail(end, format!("unexpected character '{}'", c))
                        }
                    },
                );
        });

        builder.define_terminal_node(end, |_| {});

        Ok(Self {
            graph: builder.build()?,
            syntax,
            limits,
            raw,
            argument,
            end,
        })
    }

    /// Renders `text`, replacing `{N}` with `args[N]`.
    pub fn render<A: AsRef<str>>(&self, text: &str, args: &[A]) -> Result<String, TemplateError> {
        let state = TemplateState::new(args.iter().map(|a| a.as_ref().to_string()).collect());

        let result = match self.limits.max_output_len {
            None => self.graph.process_or_raise(text, state),
            Some(limit) => {
                self.graph
                    .process_until_or_raise(text, state, |s| s.output_len() <= limit)
            }
        };

        let state = result.map_err(|e| {
            let error = match e {
                RunError::Graph(e) => TemplateError::from(e),
                RunError::Failed(e) => e,
            };
            tracing::debug!(%error, "template render failed");
            error
        })?;

        if let Some(limit) = self.limits.max_output_len {
            if state.output_len() > limit {
                tracing::debug!(limit, cursor = state.cursor(), "template output limit hit");
                return Err(TemplateError::OutputLimit { limit });
            }
        }

        Ok(state.into_output())
    }

    /// The underlying state machine.
    pub fn graph(&self) -> &Graph<TemplateState, str> {
        &self.graph
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Outline of the machine with node names attached.
    pub fn describe(&self) -> GraphSummary {
        self.graph
            .summary()
            .with_name(self.raw, "raw")
            .with_name(self.argument, "argument")
            .with_name(self.end, "end")
    }
}

/// Closes an argument reference: parses the collected digits and appends the
/// argument they name.
fn close_argument(
    ctx: &mut ExecutionContext<'_, TemplateState, str>,
    raw: NodeReference,
    end: NodeReference,
) -> NodeReference {
    let index = match ctx.state.argument_text().parse::<usize>() {
        Ok(index) => index,
        Err(_) => {
            let message = format!(
                "unable to parse '{}' as argument index",
                ctx.state.argument_text()
            );
            return ctx.fail(end, message);
        }
    };

    if ctx.state.substitute(index) {
        raw
    } else {
        let count = ctx.state.args().len();
        ctx.fail(
            end,
            format!("argument index {} out of bounds ({} arguments)", index, count),
        )
    }
}

/// Renders `text` with the default syntax and no limits.
pub fn render<A: AsRef<str>>(text: &str, args: &[A]) -> Result<String, TemplateError> {
    Template::new(Syntax::default(), Limits::default())?.render(text, args)
}
