// src/output.rs
use ndarray::{Array1, Array2};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the time grid and up to `max_paths` columns of the ensemble.
///
/// One row per time point: `t,path_0,path_1,...`
pub fn write_paths_to_csv<P: AsRef<Path>>(
    filename: P,
    time: &Array1<f64>,
    paths: &Array2<f64>,
    max_paths: usize,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    let columns = paths.ncols().min(max_paths);

    write!(file, "t")?;
    for p in 0..columns {
        write!(file, ",path_{}", p)?;
    }
    writeln!(file)?;

    for (t, row) in time.iter().zip(paths.rows()) {
        write!(file, "{}", t)?;
        for value in row.iter().take(columns) {
            write!(file, ",{}", value)?;
        }
        writeln!(file)?;
    }
    file.flush()
}

pub fn write_summary_to_csv<P: AsRef<Path>>(
    filename: P,
    summary_data: &[(&str, String)],
) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}
