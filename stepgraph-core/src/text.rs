//! Character-at-a-time stepping for text-processing machines.

use crate::context::ExecutionContext;
use crate::node::NodeBuilder;
use crate::reference::NodeReference;

/// A state that tracks a byte position into its text input.
pub trait TextCursor {
    fn cursor(&self) -> usize;

    fn set_cursor(&mut self, cursor: usize);
}

impl<S, I> NodeBuilder<S, I>
where
    S: TextCursor,
    I: AsRef<str> + ?Sized,
{
    /// Registers a step function that consumes one character per step.
    ///
    /// When the cursor is at the end of the input, `on_end` decides the next
    /// node and the cursor stays put. Otherwise `on_char` sees the character
    /// under the cursor, and the cursor moves past it afterwards, whatever
    /// node `on_char` picks.
    ///
    /// A cursor past the end of the input, or one that does not sit on a
    /// character boundary, is treated as end of input: `on_end` runs.
    pub fn char_step<E, C>(&mut self, on_end: E, on_char: C) -> &mut Self
    where
        E: Fn(&mut ExecutionContext<'_, S, I>) -> NodeReference + Send + Sync + 'static,
        C: Fn(&mut ExecutionContext<'_, S, I>, char) -> NodeReference + Send + Sync + 'static,
    {
        self.step(move |ctx| {
            let cursor = ctx.state.cursor();
            let input: &I = ctx.input;
            let text: &str = input.as_ref();
            match text.get(cursor..).and_then(|rest| rest.chars().next()) {
                None => on_end(ctx),
                Some(c) => {
                    let next = on_char(ctx, c);
                    ctx.state.set_cursor(cursor + c.len_utf8());
                    next
                }
            }
        })
    }
}
