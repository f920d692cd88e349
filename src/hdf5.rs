//! Read / Write with hdf5
//!
//! Snapshot files store every output quantity as a dataset whose first
//! axis counts the writes. Datasets are created empty and resizable and
//! grow by one entry per write.
use crate::error::{Error, Result};
use hdf5::{Dataset, File, Group, H5Type};
use ndarray::{s, Array1, Array2, Ix2};
use std::path::Path;

/// Generate full variable path inside hdf5 file from name
/// of the variable and name of the group (optional)
pub fn gen_name_path(name: &str, group: Option<&str>) -> String {
    match group {
        Some(g) if g.ends_with('/') => format!("{}{}", g, name),
        Some(g) => format!("{}/{}", g, name),
        None => name.to_owned(),
    }
}

/// Create group if it does not exist yet
pub fn require_group(file: &File, name: &str) -> Result<Group> {
    if file.link_exists(name) {
        Ok(file.group(name)?)
    } else {
        Ok(file.create_group(name)?)
    }
}

/// Create empty, resizable dataset of scalars (one entry per write)
pub fn create_series<T: H5Type>(group: &Group, name: &str) -> Result<Dataset> {
    Ok(group.new_dataset::<T>().chunk(64).shape(0..).create(name)?)
}

/// Create empty, resizable dataset of 2d arrays (one array per write)
pub fn create_series_2d(group: &Group, name: &str, shape: [usize; 2]) -> Result<Dataset> {
    Ok(group
        .new_dataset::<f64>()
        .chunk((1, shape[0], shape[1]))
        .shape((0.., shape[0], shape[1]))
        .create(name)?)
}

/// Append scalar to a series created with [`create_series`]
pub fn append_scalar<T: H5Type + Clone>(dset: &Dataset, value: T) -> Result<()> {
    let n = dset.shape()[0];
    dset.resize(n + 1)?;
    let data = Array1::from_elem(1, value);
    dset.write_slice(&data, s![n..n + 1])?;
    Ok(())
}

/// Append array to a series created with [`create_series_2d`]
pub fn append_2d(dset: &Dataset, data: &Array2<f64>) -> Result<()> {
    let shape = dset.shape();
    if shape[1..] != data.shape()[..] {
        return Err(Error::ShapeMismatch {
            name: dset.name(),
            got: data.shape().to_vec(),
            expected: shape[1..].to_vec(),
        });
    }
    let n = shape[0];
    dset.resize((n + 1, shape[1], shape[2]))?;
    dset.write_slice(data, s![n, .., ..])?;
    Ok(())
}

/// Write (fixed size) array to file
pub fn write_array1(group: &Group, name: &str, data: &Array1<f64>) -> Result<()> {
    group.new_dataset_builder().with_data(data).create(name)?;
    Ok(())
}

/// Number of writes stored in a series
pub fn series_len(file: &File, name: &str) -> Result<usize> {
    Ok(file.dataset(name)?.shape()[0])
}

/// Translate a signed index (negative counts from the end)
///
/// # Errors
/// Index outside of `0..writes`.
pub fn resolve_index(index: isize, writes: usize) -> Result<usize> {
    let resolved = if index < 0 {
        writes as isize + index
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= writes {
        return Err(Error::InvalidIndex { index, writes });
    }
    Ok(resolved as usize)
}

/// Read entry of a scalar series
pub fn read_scalar_at<T: H5Type + Copy>(file: &File, name: &str, index: usize) -> Result<T> {
    let data: Array1<T> = file.dataset(name)?.read_1d::<T>()?;
    data.get(index).copied().ok_or(Error::InvalidIndex {
        index: index as isize,
        writes: data.len(),
    })
}

/// Read entry of a 2d series
pub fn read_2d_at(file: &File, name: &str, index: usize) -> Result<Array2<f64>> {
    let dset = file.dataset(name)?;
    Ok(dset.read_slice::<f64, _, Ix2>(s![index, .., ..])?)
}

/// Open existing file for reading
pub fn open<P: AsRef<Path>>(filename: P) -> Result<File> {
    Ok(File::open(filename)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_name_path() {
        assert_eq!(gen_name_path("b", None), "b");
        assert_eq!(gen_name_path("b", Some("tasks")), "tasks/b");
        assert_eq!(gen_name_path("b", Some("tasks/")), "tasks/b");
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(-1, 5).unwrap(), 4);
        assert_eq!(resolve_index(0, 5).unwrap(), 0);
        assert_eq!(resolve_index(-5, 5).unwrap(), 0);
        assert!(resolve_index(5, 5).is_err());
        assert!(resolve_index(-6, 5).is_err());
        assert!(resolve_index(-1, 0).is_err());
    }

    #[test]
    fn test_series_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("series.h5");
        {
            let file = File::create(&filename).unwrap();
            let tasks = require_group(&file, "tasks").unwrap();
            let scales = require_group(&file, "scales").unwrap();
            let dset = create_series_2d(&tasks, "b", [3, 2]).unwrap();
            let time = create_series::<f64>(&scales, "sim_time").unwrap();
            for i in 0..3 {
                let data = Array2::from_elem((3, 2), i as f64);
                append_2d(&dset, &data).unwrap();
                append_scalar(&time, 0.5 * i as f64).unwrap();
            }
            let wrong = Array2::<f64>::zeros((2, 2));
            assert!(append_2d(&dset, &wrong).is_err());
        }
        let file = open(&filename).unwrap();
        assert_eq!(series_len(&file, "tasks/b").unwrap(), 3);
        let last = read_2d_at(&file, "tasks/b", 2).unwrap();
        assert_eq!(last, Array2::from_elem((3, 2), 2.));
        let t: f64 = read_scalar_at(&file, "scales/sim_time", 1).unwrap();
        assert!((t - 0.5).abs() < 1e-14);
    }
}
