use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

/// Native record bytes read from a file or stdin: either a read-only mmap or
/// an owned Vec. Dereferences to `&[u8]`.
pub enum NativeData {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Deref for NativeData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            NativeData::Mmap(m) => m,
            NativeData::Owned(v) => v,
        }
    }
}

/// Files under this size are read; larger regular files are mapped.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Load a native record buffer from `path`.
pub fn read_input(path: &Path) -> io::Result<NativeData> {
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    let len = metadata.len();

    if len >= MMAP_THRESHOLD && metadata.file_type().is_file() {
        // SAFETY: read-only mapping; the input is not expected to change
        // underneath us while a single array is being written.
        if let Ok(mmap) = unsafe { MmapOptions::new().map(&file) } {
            #[cfg(unix)]
            let _ = mmap.advise(memmap2::Advice::Sequential);
            return Ok(NativeData::Mmap(mmap));
        }
    }

    let mut buf = Vec::with_capacity(len as usize);
    let mut reader = file;
    reader.read_to_end(&mut buf)?;
    Ok(NativeData::Owned(buf))
}

/// Read all of stdin.
pub fn read_stdin() -> io::Result<NativeData> {
    let mut buf = Vec::new();
    io::stdin().lock().read_to_end(&mut buf)?;
    Ok(NativeData::Owned(buf))
}
