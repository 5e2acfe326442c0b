use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use sigtest_stats::{observation::Observation, sample::Sample};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    pub fn write_text<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: fmt::Display,
    {
        writeln!(&mut *self, "{value}")
            .with_context(|| format!("Failed to write report to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Writes `value` as pretty JSON or as its text report.
pub fn save_report<T>(value: &T, json: bool, output_path: Option<PathBuf>) -> anyhow::Result<()>
where
    T: serde::Serialize + fmt::Display,
{
    let mut output = Output::from_output_path(output_path)?;
    if json {
        output.write_json(value)?;
    } else {
        output.write_text(value)?;
    }
    if let Output::File { path, .. } = &output {
        eprintln!("Result saved to {}", path.display());
    }
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read observations from a JSON file into a sample
///
/// The file holds an array of `{"value": <number or string>, "group": <string>}`
/// objects. All values must be of the same kind.
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed, is empty, or mixes
/// numeric and categorical values
pub fn read_observations_file<P>(path: P) -> anyhow::Result<Sample>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let observations: Vec<Observation> = read_json_file("observations", path)?;
    if observations.is_empty() {
        bail!("{} has no observation", path.display());
    }
    let sample = Sample::from_observations(observations)
        .with_context(|| format!("Invalid sample in {}", path.display()))?;
    eprintln!(
        "Loaded {} observations in {} groups from {}",
        sample.len(),
        sample.groups().len(),
        path.display()
    );
    Ok(sample)
}
