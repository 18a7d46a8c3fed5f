use quill_gap::{Direction, GapBuffer, GapError};

use crate::registry::{BufferHandle, BufferRegistry};

/// The state one editor session threads through every command.
///
/// This is an explicit value rather than a process-wide singleton, so tests (and in principle
/// embedders) can run several independent sessions side by side.
pub struct EditorContext {
    pub registry: BufferRegistry,
    pub active: Option<BufferHandle>,
}

impl EditorContext {
    pub fn new() -> Self {
        Self {
            registry: BufferRegistry::new(),
            active: None,
        }
    }

    pub fn active_buffer(&self) -> Option<&GapBuffer> {
        self.registry.get(self.active?)
    }

    pub fn active_buffer_mut(&mut self) -> Option<&mut GapBuffer> {
        let active = self.active?;
        self.registry.get_mut(active)
    }

    /// Inserts decoded input at the active buffer's cursor, the per-keystroke path.
    pub fn type_scalar(&mut self, scalar: char) -> Result<(), GapError> {
        let mut buf = [0u8; 4];
        let encoded = quill_gap::utf8::encode(scalar as u32, &mut buf);

        let Some(buffer) = self.active_buffer_mut() else {
            return Ok(());
        };
        let cursor = buffer.gap_index();
        buffer.insert(encoded, cursor)
    }

    /// Deletes one rune at the active buffer's cursor; backspace and delete gestures both land
    /// here. Returns the number of runes removed.
    pub fn delete_at_cursor(&mut self, direction: Direction) -> usize {
        let Some(buffer) = self.active_buffer_mut() else {
            return 0;
        };
        let cursor = buffer.gap_index();
        buffer.delete(1, cursor, direction)
    }

    /// Moves the active buffer's cursor by `count` runes left or right, clamped at the
    /// extremities. Returns the cursor's new logical position, if there is an active buffer.
    pub fn move_cursor(&mut self, count: usize, direction: Direction) -> Option<usize> {
        let buffer = self.active_buffer_mut()?;

        let mut target = buffer.gap_index();
        match direction {
            Direction::Backward => {
                for _ in 0..count {
                    let Some(prev) = previous_boundary(buffer, target) else {
                        break;
                    };
                    target = prev;
                }
            }
            Direction::Forward => {
                for _ in 0..count {
                    let Some(next) = buffer.iter_from(target).next() else {
                        break;
                    };
                    let width = char_width(buffer, next.pos);
                    target = (next.pos + width).min(buffer.len());
                }
            }
        }

        buffer.move_gap_to(target);
        Some(target)
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Logical position of the scalar immediately before `pos`, or `None` at the buffer start.
fn previous_boundary(buffer: &GapBuffer, pos: usize) -> Option<usize> {
    if pos == 0 {
        return None;
    }

    let mut candidate = pos - 1;
    while candidate > 0 {
        let byte = buffer.slice(candidate, candidate + 1).ok()?;
        if quill_gap::utf8::lead_len(byte[0]).is_some() {
            break;
        }
        candidate -= 1;
    }
    Some(candidate)
}

fn char_width(buffer: &GapBuffer, pos: usize) -> usize {
    buffer
        .slice(pos, pos + 1)
        .ok()
        .and_then(|byte| quill_gap::utf8::lead_len(byte[0]))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(ctx: &EditorContext) -> String {
        String::from_utf8(ctx.active_buffer().unwrap().content()).unwrap()
    }

    #[test]
    fn typing_lands_at_the_cursor() {
        let mut ctx = EditorContext::new();
        let handle = ctx.registry.acquire("scratch", b"");
        ctx.active = Some(handle);

        for scalar in "héllo".chars() {
            ctx.type_scalar(scalar).unwrap();
        }
        assert_eq!(contents(&ctx), "héllo");

        ctx.move_cursor(3, Direction::Backward);
        ctx.type_scalar('X').unwrap();
        assert_eq!(contents(&ctx), "héXllo");
    }

    #[test]
    fn cursor_movement_walks_runes_not_bytes() {
        let mut ctx = EditorContext::new();
        let handle = ctx.registry.acquire("scratch", "a🌍b".as_bytes());
        ctx.active = Some(handle);

        assert_eq!(ctx.move_cursor(2, Direction::Forward), Some(5));
        assert_eq!(ctx.move_cursor(1, Direction::Backward), Some(1));
        assert_eq!(ctx.move_cursor(10, Direction::Forward), Some(6));
    }

    #[test]
    fn backspace_and_delete_at_the_cursor() {
        let mut ctx = EditorContext::new();
        let handle = ctx.registry.acquire("scratch", "aéb".as_bytes());
        ctx.active = Some(handle);

        ctx.move_cursor(2, Direction::Forward);
        assert_eq!(ctx.delete_at_cursor(Direction::Backward), 1);
        assert_eq!(contents(&ctx), "ab");
        assert_eq!(ctx.delete_at_cursor(Direction::Forward), 1);
        assert_eq!(contents(&ctx), "a");
    }

    #[test]
    fn sessions_are_independent() {
        let mut first = EditorContext::new();
        let mut second = EditorContext::new();

        first.active = Some(first.registry.acquire("a", b"one"));
        second.active = Some(second.registry.acquire("b", b"two"));

        first.type_scalar('!').unwrap();
        assert_eq!(contents(&first), "!one");
        assert_eq!(contents(&second), "two");
    }

    #[test]
    fn edits_without_an_active_buffer_are_no_ops() {
        let mut ctx = EditorContext::new();

        assert!(ctx.type_scalar('x').is_ok());
        assert_eq!(ctx.delete_at_cursor(Direction::Backward), 0);
        assert_eq!(ctx.move_cursor(1, Direction::Forward), None);
    }
}
