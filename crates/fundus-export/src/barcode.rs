use barcoders::sym::code128::Code128;

use crate::error::ExportError;

// Code128 needs a leading character-set selector; set B covers the
// access-code alphabet.
const CHARSET_B: char = 'Ɓ';

/// Encode `data` as Code128 and return the module pattern (1 = bar, 0 = space).
pub fn code128_modules(data: &str) -> Result<Vec<u8>, ExportError> {
    let symbol = Code128::new(format!("{CHARSET_B}{data}"))
        .map_err(|e| ExportError::Barcode(format!("{e:?}")))?;
    Ok(symbol.encode())
}

/// Collapse a module pattern into `(start, width)` runs of bars, in modules.
pub fn bar_runs(modules: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &m) in modules.iter().enumerate() {
        match (m, start) {
            (1, None) => start = Some(i),
            (0, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, modules.len() - s));
    }
    runs
}
