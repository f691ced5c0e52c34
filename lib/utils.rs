//! Output helpers for the driver binaries.

/// Create a directory and all of its parents if they don't already exist.
///
/// Expands to a `std::io::Result<()>`.
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        std::fs::create_dir_all(&$dir)
    }
}

/// Write a set of named arrays to a single `.npz` archive.
///
/// ```ignore
/// write_npz!(
///     outdir.join("data.npz"),
///     arrays: {
///         "time" => &time,
///         "psi" => &psi,
///     }
/// )?;
/// ```
///
/// Expands to a [`SimResult<()>`][crate::error::SimResult].
#[macro_export]
macro_rules! write_npz {
    (
        $filename:expr,
        arrays: { $( $name:expr => $arr:expr ),+ $(,)? }
    ) => {
        (|| -> $crate::error::SimResult<()> {
            let mut npz = $crate::ndarray_npy::NpzWriter::new(
                std::fs::File::create($filename)?);
            $(
                npz.add_array($name, $arr)?;
            )+
            npz.finish()?;
            Ok(())
        })()
    }
}
