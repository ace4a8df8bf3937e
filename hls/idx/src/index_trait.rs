/// A type that can be used as a dense index into an [IndexedMap].
///
/// [IndexedMap]: crate::maps::IndexedMap
pub trait IndexRef: Copy + Eq {
    fn index(&self) -> usize;
    fn new(input: usize) -> Self;
}
