/// Sequential concept index allocator.
///
/// Each pass that (re)numbers concepts owns one counter, so numbering is an
/// explicit step rather than state shared between passes.
#[derive(Debug, Default, Clone)]
pub struct IndexCounter {
    next: usize,
}

impl IndexCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next index.
    pub fn next_index(&mut self) -> usize {
        let index = self.next;
        self.next += 1;
        index
    }
}
