use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::Path;

/// Result of comparing the generated and removed sink files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkComparison {
    pub generated_len: u64,
    pub removed_len: u64,
    pub common_prefix: u64,
}

impl SinkComparison {
    /// The removed stream is a prefix of the generated stream.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.common_prefix == self.removed_len
    }

    /// Both streams are identical.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.is_consistent() && self.generated_len == self.removed_len
    }

    /// Bytes generated but not yet removed.
    #[inline]
    pub fn in_flight(&self) -> u64 {
        self.generated_len.saturating_sub(self.removed_len)
    }
}

enum Mapped {
    Empty,
    Map(Mmap),
}

impl Mapped {
    fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Self::Empty);
        }
        // SAFETY: the sinks are append-only, so mapped bytes are never rewritten.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self::Map(map))
    }

    fn bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Map(map) => &map[..],
        }
    }
}

pub fn compare_sinks<P, Q>(generated: P, removed: Q) -> io::Result<SinkComparison>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let generated = Mapped::open(generated.as_ref())?;
    let removed = Mapped::open(removed.as_ref())?;
    let (g, r) = (generated.bytes(), removed.bytes());

    let common_prefix = g.iter().zip(r).take_while(|(a, b)| a == b).count();

    Ok(SinkComparison {
        generated_len: g.len() as u64,
        removed_len: r.len() as u64,
        common_prefix: common_prefix as u64,
    })
}
