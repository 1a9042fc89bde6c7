//! APR binary container with JSON metadata.
//!
//! Layout (all integers u32 little-endian):
//! ```text
//! [4-byte magic: "APR1"]
//! [metadata_len][JSON metadata: arbitrary key-value pairs]
//! [n_tensors]
//! [index_len][JSON tensor index: name, dtype, shape, offset, size]
//! [Raw tensor data: f32 values in little-endian]
//! [4-byte CRC32 of all preceding bytes]
//! ```
//!
//! Every read is bounds-checked; a truncated or tampered file yields an
//! error, never a panic.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Magic bytes for the APR container - "APR1"
pub const APR_MAGIC: [u8; 4] = [b'A', b'P', b'R', b'1'];

const CRC_LEN: usize = 4;

/// Tensor descriptor in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AprTensorDescriptor {
    /// Tensor name
    pub name: String,
    /// Data type (only "F32" is written)
    pub dtype: String,
    /// Shape dimensions
    pub shape: Vec<usize>,
    /// Byte offset in data section
    pub offset: usize,
    /// Byte size
    pub size: usize,
}

/// APR file metadata - arbitrary JSON
pub type AprMetadata = BTreeMap<String, JsonValue>;

/// Sequential little-endian reader over the container body.
struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], String> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| format!("File too short for {what}"))?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn read_u32(&mut self, what: &str) -> Result<usize, String> {
        let bytes = self.take(4, what)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
    }
}

/// APR format reader
#[derive(Debug)]
pub struct AprReader {
    /// Parsed metadata
    pub metadata: AprMetadata,
    /// Tensor descriptors
    pub tensors: Vec<AprTensorDescriptor>,
    /// Raw file data
    data: Vec<u8>,
    /// Offset to tensor data section
    tensor_data_offset: usize,
}

impl AprReader {
    /// Load APR file from path
    ///
    /// # Errors
    /// Returns error if file is invalid or cannot be read
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let data = fs::read(path).map_err(|e| format!("Failed to read file: {e}"))?;
        Self::from_bytes(data)
    }

    /// True if `data` starts with the APR magic.
    #[must_use]
    pub fn is_apr(data: &[u8]) -> bool {
        data.get(0..4) == Some(&APR_MAGIC[..])
    }

    /// Parse APR format from bytes
    ///
    /// # Errors
    /// Returns error if the magic, checksum, or any section is invalid
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, String> {
        if data.len() < APR_MAGIC.len() + CRC_LEN {
            return Err("File too short".to_string());
        }
        if !Self::is_apr(&data) {
            let magic = &data[0..4];
            return Err(format!("Invalid magic: expected APR1, got {magic:?}"));
        }

        let body_len = data.len() - CRC_LEN;
        let stored = u32::from_le_bytes([
            data[body_len],
            data[body_len + 1],
            data[body_len + 2],
            data[body_len + 3],
        ]);
        let computed = crc32fast::hash(&data[..body_len]);
        if stored != computed {
            return Err(format!(
                "Checksum mismatch: expected 0x{stored:08X}, got 0x{computed:08X}"
            ));
        }

        let mut cursor = Cursor {
            data: &data[..body_len],
            offset: APR_MAGIC.len(),
        };

        let metadata_len = cursor.read_u32("metadata length")?;
        let metadata_json = cursor.take(metadata_len, "metadata")?;
        let metadata: AprMetadata = if metadata_len > 0 {
            serde_json::from_slice(metadata_json)
                .map_err(|e| format!("Invalid metadata JSON: {e}"))?
        } else {
            BTreeMap::new()
        };

        let n_tensors = cursor.read_u32("tensor count")?;
        let index_len = cursor.read_u32("tensor index length")?;
        let index_data = cursor.take(index_len, "tensor index")?;
        let tensors: Vec<AprTensorDescriptor> = if n_tensors > 0 {
            serde_json::from_slice(index_data).map_err(|e| format!("Invalid tensor index: {e}"))?
        } else {
            Vec::new()
        };
        if tensors.len() != n_tensors {
            return Err(format!(
                "Tensor count {n_tensors} disagrees with index ({} entries)",
                tensors.len()
            ));
        }

        let tensor_data_offset = cursor.offset;
        let data_len = body_len - tensor_data_offset;
        for desc in &tensors {
            let fits = desc
                .offset
                .checked_add(desc.size)
                .is_some_and(|end| end <= data_len);
            if !fits || desc.size % 4 != 0 {
                return Err(format!("Tensor data out of bounds: {}", desc.name));
            }
        }

        Ok(Self {
            metadata,
            tensors,
            data,
            tensor_data_offset,
        })
    }

    /// Get metadata value by key
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&JsonValue> {
        self.metadata.get(key)
    }

    /// Names of all tensors, in index order.
    pub fn tensor_names(&self) -> impl Iterator<Item = &str> {
        self.tensors.iter().map(|t| t.name.as_str())
    }

    /// Read tensor data as f32 values
    ///
    /// # Errors
    /// Returns error if tensor not found or has an unsupported dtype
    pub fn read_tensor_f32(&self, name: &str) -> Result<Vec<f32>, String> {
        let desc = self
            .tensors
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| format!("Tensor not found: {name}"))?;
        if desc.dtype != "F32" {
            return Err(format!("Tensor {name} has dtype {}, expected F32", desc.dtype));
        }

        // Bounds were validated in from_bytes.
        let start = self.tensor_data_offset + desc.offset;
        let bytes = &self.data[start..start + desc.size];
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }
}

/// APR format writer
#[derive(Debug, Default)]
pub struct AprWriter {
    /// Metadata to write
    metadata: AprMetadata,
    /// Tensors to write
    tensors: Vec<(AprTensorDescriptor, Vec<u8>)>,
}

impl AprWriter {
    /// Create new writer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set metadata key-value pair
    pub fn set_metadata(&mut self, key: impl Into<String>, value: JsonValue) {
        self.metadata.insert(key.into(), value);
    }

    /// Add tensor with f32 data
    pub fn add_tensor_f32(&mut self, name: impl Into<String>, shape: Vec<usize>, data: &[f32]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        let offset: usize = self.tensors.iter().map(|(_, d)| d.len()).sum();

        let desc = AprTensorDescriptor {
            name: name.into(),
            dtype: "F32".to_string(),
            shape,
            offset,
            size: bytes.len(),
        };

        self.tensors.push((desc, bytes));
    }

    /// Write to bytes
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_bytes(&self) -> Result<Vec<u8>, String> {
        let mut output = Vec::new();

        // 1. Magic
        output.extend_from_slice(&APR_MAGIC);

        // 2. Metadata
        let metadata_json = serde_json::to_vec(&self.metadata)
            .map_err(|e| format!("Metadata serialization failed: {e}"))?;
        push_len(&mut output, metadata_json.len())?;
        output.extend_from_slice(&metadata_json);

        // 3. Tensor count
        push_len(&mut output, self.tensors.len())?;

        // 4. Tensor index
        let descriptors: Vec<_> = self.tensors.iter().map(|(d, _)| d).collect();
        let index_json = serde_json::to_vec(&descriptors)
            .map_err(|e| format!("Index serialization failed: {e}"))?;
        push_len(&mut output, index_json.len())?;
        output.extend_from_slice(&index_json);

        // 5. Tensor data
        for (_, data) in &self.tensors {
            output.extend_from_slice(data);
        }

        // 6. CRC32
        let crc = crc32fast::hash(&output);
        output.extend_from_slice(&crc.to_le_bytes());

        Ok(output)
    }

    /// Write to file
    ///
    /// # Errors
    /// Returns error if write fails
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| format!("Write failed: {e}"))
    }
}

fn push_len(output: &mut Vec<u8>, len: usize) -> Result<(), String> {
    let len = u32::try_from(len).map_err(|_| format!("Section too large: {len} bytes"))?;
    output.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests;
