pub struct RingBuffer {
    pub(crate) storage: Box<[u8]>,
    pub(crate) capacity: usize,
    pub(crate) read_offset: usize,
    pub(crate) len: usize,
}
