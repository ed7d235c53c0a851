use crate::error::LoadError;
use crate::memory::{Memory, MEMORY_MAX};

/// Loaded program body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Image {
    pub origin: u16,
    /// Amount of body words written.
    pub len: usize,
}

/// Place a raw object image into memory.
///
/// The first big-endian word is the origin, every following big-endian word is stored
/// sequentially from the origin. A trailing odd byte becomes the high byte of a final word.
pub fn load_image(bytes: &[u8], mem: &mut Memory) -> Result<Image, LoadError> {
    let (origin, body) = match bytes {
        [hi, lo, body @ ..] => (u16::from_be_bytes([*hi, *lo]), body),
        _ => return Err(LoadError::Empty),
    };

    let words: Vec<u16> = body
        .chunks(2)
        .map(|word| u16::from_be_bytes([word[0], word.get(1).copied().unwrap_or(0)]))
        .collect();

    if origin as usize + words.len() > MEMORY_MAX {
        return Err(LoadError::TooLong {
            origin,
            words: words.len(),
        });
    }

    mem.copy_from(origin, &words);
    Ok(Image {
        origin,
        len: words.len(),
    })
}
