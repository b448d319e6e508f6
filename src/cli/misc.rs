use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// A reader for the file at `path`, decompressing the file if built with the xz feature and the file has an xz extension.
pub fn open_reader(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;

    match path.extension() {
        #[cfg(feature = "xz")]
        Some(extension) if extension == "xz" => {
            Ok(Box::new(BufReader::new(xz2::read::XzDecoder::new(file))))
        }
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

/// The contents of the file at `path`, as a single line.
pub fn read_formula(path: &Path) -> std::io::Result<String> {
    let mut formula = String::default();
    for line in open_reader(path)?.lines() {
        formula.push_str(line?.trim());
    }
    Ok(formula)
}
