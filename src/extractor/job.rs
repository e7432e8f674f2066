use crate::error::ExtractError;
use crate::extractor::writer::write_table;
use crate::extractor::Config;
use crate::extractor::Extractor;
use crate::spreadsheet::loader::GridLoader;
use crate::spreadsheet::loader::WorkbookLoader;
use std::path::Path;
use std::path::PathBuf;

/// One configuration file and the directory its output goes to.
///
/// Output files are named after the configuration file: `orders.json` produces `orders.csv`,
/// or `orders.txt` holding the error text when the run is expected to fail.
#[derive(Clone, Debug)]
pub struct Job {
    config_file: PathBuf,
    output_dir: PathBuf,
}

impl Job {
    /// Checks that the configuration file exists and creates the output directory if needed.
    pub fn new(config_file: &Path, output_dir: &Path) -> Result<Job, ExtractError> {
        if !config_file.is_file() {
            Err(ExtractError::ConfigFileNotFound(config_file.display().to_string()))?;
        }
        if !output_dir.is_dir() {
            std::fs::create_dir_all(output_dir)?;
        }
        Ok(Job {
            config_file: config_file.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Path of an output file with the configuration's stem and the given extension.
    pub fn output_file(&self, extension: &str) -> PathBuf {
        let mut name = self.config_file.file_stem().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(extension);
        self.output_dir.join(name)
    }

    /// Extracts from spreadsheet files on disk and writes the CSV file.
    pub fn run(&self) -> Result<PathBuf, ExtractError> {
        self.run_with(WorkbookLoader)
    }

    /// Extracts with the given loader and writes the CSV file, returning its path.
    pub fn run_with<L: GridLoader>(&self, loader: L) -> Result<PathBuf, ExtractError> {
        let config = Config::from_file(&self.config_file)?;
        let extraction = Extractor::new(loader).extract(&config)?;
        let destination = self.output_file("csv");
        write_table(&destination, &extraction.header, &extraction.rows)?;
        tracing::info!(destination = %destination.display(), rows = extraction.rows.len(), "table written");
        Ok(destination)
    }

    /// Runs a job that must fail and writes the error text, without a trailing newline.
    ///
    /// Returns the path of the text file, or [`ExtractError::UnexpectedSuccess`] when the run succeeded.
    pub fn run_expecting_failure(&self) -> Result<PathBuf, ExtractError> {
        self.run_expecting_failure_with(WorkbookLoader)
    }

    pub fn run_expecting_failure_with<L: GridLoader>(&self, loader: L) -> Result<PathBuf, ExtractError> {
        match self.run_with(loader) {
            Ok(_) => Err(ExtractError::UnexpectedSuccess(self.config_file.display().to_string())),
            Err(error) => {
                let destination = self.output_file("txt");
                std::fs::write(&destination, error.to_string())?;
                tracing::info!(destination = %destination.display(), %error, "failure recorded");
                Ok(destination)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::tests::MemoryLoader;
    use crate::spreadsheet::xlsx::tests::write_workbook;

    fn loader() -> MemoryLoader {
        MemoryLoader::new(&[
            &[Some("Name"), Some("Price")],
            &[Some("Tea, green"), Some("3.5")],
            &[Some("Coffee"), None],
        ])
    }

    fn write_config(directory: &Path, name: &str, json: &str) -> PathBuf {
        let path = directory.join(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn missing_config_file() {
        let directory = tempfile::tempdir().unwrap();
        let error = Job::new(&directory.path().join("missing.json"), directory.path()).unwrap_err();
        assert!(error.to_string().starts_with("Config file not found: "));
    }

    #[test]
    fn creates_output_directory() {
        let directory = tempfile::tempdir().unwrap();
        let config = write_config(directory.path(), "prices.json", "{}");
        let output = directory.path().join("results").join("nested");
        let job = Job::new(&config, &output).unwrap();
        assert!(output.is_dir());
        assert_eq!(job.output_file("csv"), output.join("prices.csv"));
    }

    #[test]
    fn writes_csv_named_after_config() {
        let directory = tempfile::tempdir().unwrap();
        let config = write_config(directory.path(), "prices.json", r#"{
            "source": "prices.xlsx",
            "sheet": "Sheet1",
            "headers": [{"range": "A1:B1"}],
            "data": [{"range": "A2:B3"}],
            "na": "NA"
        }"#);
        let job = Job::new(&config, directory.path()).unwrap();
        let path = job.run_with(loader()).unwrap();
        assert_eq!(path, directory.path().join("prices.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Name,Price\r\n\"Tea, green\",3.5\r\nCoffee,NA\r\n");
    }

    #[test]
    fn failure_text_is_recorded() {
        let directory = tempfile::tempdir().unwrap();
        let config = write_config(directory.path(), "bad_must_fail.json", r#"{
            "source": "prices.xlsx",
            "sheet": "Sheet1",
            "headers": [{"range": "A1"}]
        }"#);
        let job = Job::new(&config, directory.path()).unwrap();
        let path = job.run_expecting_failure_with(loader()).unwrap();
        assert_eq!(path, directory.path().join("bad_must_fail.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Header 1 / selector 'A1': Must contain ':'");
        assert!(!directory.path().join("bad_must_fail.csv").exists());
    }

    #[test]
    fn unexpected_success() {
        let directory = tempfile::tempdir().unwrap();
        let config = write_config(directory.path(), "ok.json", r#"{"source": "s.xlsx", "sheet": 0, "headers": [{"static": "a"}]}"#);
        let job = Job::new(&config, directory.path()).unwrap();
        let error = job.run_expecting_failure_with(loader()).unwrap_err();
        assert!(matches!(error, ExtractError::UnexpectedSuccess(_)));
    }

    #[test]
    fn runs_against_workbook_file() {
        let directory = tempfile::tempdir().unwrap();
        let workbook = write_workbook(directory.path());
        let json = serde_json::json!({
            "source": workbook.to_str().unwrap(),
            "sheet": "Orders",
            "headers": [{"static": "Order"}, {"range": "B1:C1"}],
            "data": [{"range": "A2:C4"}],
            "na": "-"
        });
        let config = write_config(directory.path(), "orders.json", &json.to_string());
        let job = Job::new(&config, &directory.path().join("out")).unwrap();
        let path = job.run().unwrap();
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Order,Customer,Shipped\r\n1001,Fish & Chips,2024-01-01\r\n-,-,-\r\n1002.5,true,#DIV/0!\r\n"
        );
    }
}
