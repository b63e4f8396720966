use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "Base de Dados.xlsx";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";

/// Start-up settings of the dashboard server
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    /// Spreadsheet read once at start-up
    pub data_file: PathBuf,
    pub bind_addr: SocketAddr,
    /// Size of the PNG charts in pixels
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8050)),
            chart_width: 900,
            chart_height: 500,
        }
    }
}

impl DashboardConfig {
    /// Builds the configuration from positional arguments
    ///
    /// Usage: `dashboard [data-file] [bind-address]`. The first element of
    /// `args` is the program name and is skipped.
    ///
    /// # Errors
    /// * A message naming the argument when the bind address does not parse
    pub fn from_args<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().skip(1);

        if let Some(path) = args.next() {
            config.data_file = PathBuf::from(path);
        }
        if let Some(addr) = args.next() {
            config.bind_addr = addr
                .parse()
                .map_err(|e| format!("invalid bind address {:?}: {}", addr, e))?;
        }
        Ok(config)
    }
}
