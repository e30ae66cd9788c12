//! Writes PyTorch `state_dict` archives for tests.
//!
//! The layout matches `torch.save(model.state_dict(), path)`: a zip holding
//! `archive/data.pkl` (a protocol 2 pickle of the tensor dict) and one raw little-endian
//! storage per tensor under `archive/data/<key>`. Batch norm layers also get the int64
//! `num_batches_tracked` scalar that torch always saves.

use super::mobilenet_v2::{MobileNetV2, MobileNetV2Config};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const ARCHIVE_DIR: &str = "archive";

enum Storage {
    Float(Vec<f32>),
    Long(Vec<i64>),
}

impl Storage {
    fn class_name(&self) -> &'static str {
        match self {
            Storage::Float(_) => "FloatStorage",
            Storage::Long(_) => "LongStorage",
        }
    }

    fn numel(&self) -> usize {
        match self {
            Storage::Float(values) => values.len(),
            Storage::Long(values) => values.len(),
        }
    }

    fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Storage::Float(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            Storage::Long(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }
}

struct Entry {
    shape: Vec<usize>,
    storage: Storage,
}

#[derive(Default)]
struct Pickler {
    buf: Vec<u8>,
}

impl Pickler {
    fn op(&mut self, code: u8) {
        self.buf.push(code);
    }

    fn unicode(&mut self, value: &str) {
        self.op(b'X');
        self.buf.extend((value.len() as u32).to_le_bytes());
        self.buf.extend(value.as_bytes());
    }

    fn int(&mut self, value: usize) {
        if value < 0x100 {
            self.op(b'K');
            self.buf.push(value as u8);
        } else if value < 0x10000 {
            self.op(b'M');
            self.buf.extend((value as u16).to_le_bytes());
        } else {
            self.op(b'J');
            self.buf.extend((value as i32).to_le_bytes());
        }
    }

    fn global(&mut self, module: &str, name: &str) {
        self.op(b'c');
        self.buf.extend(format!("{module}\n{name}\n").as_bytes());
    }

    fn int_tuple(&mut self, values: &[usize]) {
        if values.is_empty() {
            self.op(b')');
            return;
        }
        self.op(b'(');
        for &v in values {
            self.int(v);
        }
        self.op(b't');
    }

    /// `torch._utils._rebuild_tensor_v2(storage, 0, shape, stride, False, {})`
    fn tensor(&mut self, storage_key: &str, entry: &Entry) {
        self.global("torch._utils", "_rebuild_tensor_v2");
        self.op(b'(');

        self.op(b'(');
        self.unicode("storage");
        self.global("torch", entry.storage.class_name());
        self.unicode(storage_key);
        self.unicode("cpu");
        self.int(entry.storage.numel());
        self.op(b't');
        self.op(b'Q');

        self.int(0);
        self.int_tuple(&entry.shape);
        self.int_tuple(&contiguous_strides(&entry.shape));
        self.op(0x89);
        self.op(b'}');

        self.op(b't');
        self.op(b'R');
    }
}

fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

fn float_entry(tensor: &Tensor) -> Entry {
    Entry {
        shape: tensor.dims().to_vec(),
        storage: Storage::Float(tensor.flatten_all().unwrap().to_vec1::<f32>().unwrap()),
    }
}

/// Saves every variable of `varmap` as a torch `state_dict` archive at `path`.
pub(crate) fn save_varmap(varmap: &VarMap, path: &Path) {
    let mut entries = BTreeMap::new();
    for (name, var) in varmap.data().lock().unwrap().iter() {
        if let Some(prefix) = name.strip_suffix("running_var") {
            entries.insert(
                format!("{prefix}num_batches_tracked"),
                Entry {
                    shape: Vec::new(),
                    storage: Storage::Long(vec![1000]),
                },
            );
        }
        entries.insert(name.clone(), float_entry(var.as_tensor()));
    }

    let mut pickle = Pickler::default();
    pickle.op(0x80);
    pickle.buf.push(2);
    pickle.op(b'}');
    pickle.op(b'(');
    for (key, (name, entry)) in entries.iter().enumerate() {
        pickle.unicode(name);
        pickle.tensor(&key.to_string(), entry);
    }
    pickle.op(b'u');
    pickle.op(b'.');

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    zip.start_file(format!("{ARCHIVE_DIR}/data.pkl"), options)
        .unwrap();
    zip.write_all(&pickle.buf).unwrap();
    for (key, entry) in entries.values().enumerate() {
        zip.start_file(format!("{ARCHIVE_DIR}/data/{key}"), options)
            .unwrap();
        zip.write_all(&entry.storage.to_le_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Builds a randomly initialized MobileNetV2 and saves it at `path`.
pub(crate) fn save_random_mobilenet(config: &MobileNetV2Config, path: &Path) -> VarMap {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    MobileNetV2::load(config, vb).unwrap();
    save_varmap(&varmap, path);
    varmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_strides() {
        assert_eq!(contiguous_strides(&[6, 1280]), vec![1280, 1]);
        assert_eq!(contiguous_strides(&[96, 1, 3, 3]), vec![9, 9, 3, 1]);
        assert!(contiguous_strides(&[]).is_empty());
    }

    #[test]
    fn test_saved_archive_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.pth");

        let varmap = VarMap::new();
        varmap
            .get((2, 3), "fc.weight", candle_nn::Init::Const(0.5), DType::F32, &Device::Cpu)
            .unwrap();
        varmap
            .get(3, "bn.running_var", candle_nn::Init::Const(2.0), DType::F32, &Device::Cpu)
            .unwrap();
        save_varmap(&varmap, &path);

        let tensors = candle_core::pickle::read_all(&path).unwrap();
        let names: Vec<&str> = tensors.iter().map(|(name, _)| name.as_str()).collect();
        assert!(names.contains(&"fc.weight"));
        assert!(names.contains(&"bn.running_var"));
        assert!(names.contains(&"bn.num_batches_tracked"));

        let (_, weight) = tensors.iter().find(|(name, _)| name == "fc.weight").unwrap();
        assert_eq!(weight.dims(), &[2, 3]);
        assert_eq!(weight.flatten_all().unwrap().to_vec1::<f32>().unwrap(), vec![0.5; 6]);
    }
}
