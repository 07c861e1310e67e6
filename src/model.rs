use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::encoder::{Features, FEATURE_LEN};
use crate::error::{Error, Result};

pub const MAGIC: &[u8; 8] = b"VALNET01";
pub const VERSION: u32 = 1;
const HEADER_LEN: usize = 8 + 4 * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelMeta {
    pub version: u32,
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
}

/// Dense value network: `w2 · relu(w1 · x + b1) + b2`.
#[derive(Debug, Clone)]
pub struct ValueNet {
    pub meta: ModelMeta,
    w1: Vec<f32>, // hidden_dim x input_dim
    b1: Vec<f32>, // hidden_dim
    w2: Vec<f32>, // output_dim x hidden_dim
    b2: Vec<f32>, // output_dim
}

impl ValueNet {
    /// All-zero weights with the given output bias.
    pub fn constant(hidden_dim: usize, bias: f32) -> Self {
        Self {
            meta: meta(hidden_dim),
            w1: vec![0.0; hidden_dim * FEATURE_LEN],
            b1: vec![0.0; hidden_dim],
            w2: vec![0.0; hidden_dim],
            b2: vec![bias],
        }
    }

    /// Seeded uniform init in +-1/sqrt(fan_in).
    pub fn random(hidden_dim: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let k1 = 1.0 / (FEATURE_LEN as f32).sqrt();
        let k2 = 1.0 / (hidden_dim.max(1) as f32).sqrt();
        let mut draw = |n: usize, k: f32| -> Vec<f32> { (0..n).map(|_| rng.gen_range(-k..=k)).collect() };
        let w1 = draw(hidden_dim * FEATURE_LEN, k1);
        let b1 = draw(hidden_dim, k1);
        let w2 = draw(hidden_dim, k2);
        let b2 = draw(1, k2);
        Self { meta: meta(hidden_dim), w1, b1, w2, b2 }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Format:
        // magic: 8 bytes b"VALNET01"
        // u32 version (LE)
        // u32 input_dim, u32 hidden_dim, u32 output_dim (LE)
        // f32 w1[hidden_dim * input_dim]
        // f32 b1[hidden_dim]
        // f32 w2[output_dim * hidden_dim]
        // f32 b2[output_dim]
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        let file_len = f.metadata().map_err(|e| Error::io(path, e))?.len();
        let mut r = BufReader::new(f);
        let mut magic = [0u8; 8];
        read_exact(&mut r, &mut magic, "magic", path)?;
        if &magic != MAGIC {
            return Err(Error::Checkpoint(format!("{}: bad magic", path.display())));
        }
        let version = read_u32(&mut r, "version", path)?;
        let input_dim = read_u32(&mut r, "input_dim", path)? as usize;
        let hidden_dim = read_u32(&mut r, "hidden_dim", path)? as usize;
        let output_dim = read_u32(&mut r, "output_dim", path)? as usize;
        if input_dim != FEATURE_LEN {
            return Err(Error::ModelShapeMismatch { what: "input width", expected: FEATURE_LEN, found: input_dim });
        }
        if output_dim != 1 {
            return Err(Error::ModelShapeMismatch { what: "output width", expected: 1, found: output_dim });
        }
        // nothing is allocated until the header agrees with the file size
        let expected_len = payload_floats(input_dim, hidden_dim, output_dim)
            .and_then(|n| n.checked_mul(4))
            .and_then(|n| n.checked_add(HEADER_LEN))
            .ok_or_else(|| Error::Checkpoint(format!("{}: hidden_dim {} overflows", path.display(), hidden_dim)))?;
        if expected_len as u64 != file_len {
            return Err(Error::Checkpoint(format!(
                "{}: header (hidden_dim {}) needs {} bytes, file has {}",
                path.display(),
                hidden_dim,
                expected_len,
                file_len
            )));
        }
        let w1 = read_f32s(&mut r, hidden_dim * input_dim, "w1", path)?;
        let b1 = read_f32s(&mut r, hidden_dim, "b1", path)?;
        let w2 = read_f32s(&mut r, output_dim * hidden_dim, "w2", path)?;
        let b2 = read_f32s(&mut r, output_dim, "b2", path)?;
        Ok(Self { meta: ModelMeta { version, input_dim, hidden_dim, output_dim }, w1, b1, w2, b2 })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut w = BufWriter::new(f);
        let write = |w: &mut BufWriter<File>| -> std::io::Result<()> {
            w.write_all(MAGIC)?;
            for v in [self.meta.version as usize, self.meta.input_dim, self.meta.hidden_dim, self.meta.output_dim] {
                w.write_all(&(v as u32).to_le_bytes())?;
            }
            for x in self.w1.iter().chain(&self.b1).chain(&self.w2).chain(&self.b2) {
                w.write_all(&x.to_le_bytes())?;
            }
            w.flush()
        };
        write(&mut w).map_err(|e| Error::io(path, e))
    }

    /// Forward pass on raw model input.
    pub fn forward(&self, x: &[f32]) -> Result<f32> {
        let n = self.meta.input_dim;
        if x.len() != n {
            return Err(Error::ModelShapeMismatch { what: "input width", expected: n, found: x.len() });
        }
        let h = self.meta.hidden_dim;
        let mut out = self.b2[0];
        for j in 0..h {
            let row = &self.w1[j * n..(j + 1) * n];
            let sum = self.b1[j] + row.iter().zip(x).map(|(w, v)| w * v).sum::<f32>();
            out += self.w2[j] * sum.max(0.0);
        }
        Ok(out)
    }

    pub fn predict(&self, feats: &Features) -> Result<f32> { self.forward(&feats.to_input()) }
}

fn meta(hidden_dim: usize) -> ModelMeta {
    ModelMeta { version: VERSION, input_dim: FEATURE_LEN, hidden_dim, output_dim: 1 }
}

/// Number of f32 values following the header.
fn payload_floats(input_dim: usize, hidden_dim: usize, output_dim: usize) -> Option<usize> {
    let w1 = hidden_dim.checked_mul(input_dim)?;
    let w2 = output_dim.checked_mul(hidden_dim)?;
    w1.checked_add(hidden_dim)?.checked_add(w2)?.checked_add(output_dim)
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8], what: &str, path: &Path) -> Result<()> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::Checkpoint(format!("{}: truncated while reading {}", path.display(), what))
        } else {
            Error::io(path, e)
        }
    })
}

fn read_u32<R: Read>(r: &mut R, what: &str, path: &Path) -> Result<u32> {
    let mut b = [0u8; 4];
    read_exact(r, &mut b, what, path)?;
    Ok(u32::from_le_bytes(b))
}

fn read_f32s<R: Read>(r: &mut R, n: usize, what: &str, path: &Path) -> Result<Vec<f32>> {
    let mut buf = vec![0u8; n * 4];
    read_exact(r, &mut buf, what, path)?;
    Ok(buf.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect())
}
