/*!
Writing sampled chains to disk for external plotting and diagnostics tools.
Enable via the `csv` feature.
*/

use csv::Writer;
use ndarray::{s, ArrayView3};
use std::error::Error;
use std::fs::File;
use std::path::Path;

/**
Writes an ensemble run in long ("tidy") form: one CSV record per recorded state, keyed by
walker index and step index, with one column per parameter. Burn-in is not removed, so
callers can choose it later from the file.

Values use the shortest representation that parses back to the same `f64`.

# Examples

```rust
use mh_fit::io::save_csv;
use ndarray::arr3;

let data = arr3(&[[[1.0, 2.0], [1.5, 2.5]]]);
let path = std::env::temp_dir().join("mh_fit_chain.csv");
save_csv(data.view(), &path)?;
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
pub fn save_csv<P: AsRef<Path>>(
    samples: ArrayView3<'_, f64>,
    filename: P,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    let (n_walkers, n_steps, n_params) = samples.dim();

    let params = (0..n_params).map(|i| format!("theta_{i}"));
    wtr.write_record(["walker".to_string(), "step".to_string()].into_iter().chain(params))?;

    for walker in 0..n_walkers {
        for step in 0..n_steps {
            let state = samples.slice(s![walker, step, ..]);
            let record = [walker.to_string(), step.to_string()]
                .into_iter()
                .chain(state.iter().map(f64::to_string));
            wtr.write_record(record)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
