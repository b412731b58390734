use crate::batch::Batch;

/// On-disk location of one row group: byte offset of its first byte, byte
/// size of its payload (including the leading row-count word), and its row
/// count. Serialized as a packed 20-byte entry in the footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowGroupMeta {
    pub offset: u64,
    pub size: u64,
    pub row_count: u32,
}

impl RowGroupMeta {
    /// Packed size on disk: u64 offset + u64 size + u32 row count.
    pub const SERIALIZED_SIZE: usize = 20;
}

/// A batch paired with its file location. Offset and size stay zero until
/// the writer emits the group and fills them in.
#[derive(Debug)]
pub struct RowGroup {
    batch: Batch,
    meta: RowGroupMeta,
}

impl RowGroup {
    pub fn new(batch: Batch) -> Self {
        let meta = RowGroupMeta {
            row_count: batch.row_count() as u32,
            ..RowGroupMeta::default()
        };
        RowGroup { batch, meta }
    }

    pub fn with_meta(batch: Batch, meta: RowGroupMeta) -> Self {
        RowGroup { batch, meta }
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn into_batch(self) -> Batch {
        self.batch
    }

    pub fn meta(&self) -> &RowGroupMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: RowGroupMeta) {
        self.meta = meta;
    }
}
