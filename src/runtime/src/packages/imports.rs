//! Import checks for requested packages.

/// Package name → import name, where they differ.
const PACKAGE_MAPPING: &[(&str, &str)] = &[
    // Python
    ("beautifulsoup4", "bs4"),
    ("jupyter-pluto-proxy", "jupyter_pluto_proxy"),
    ("matplotlib-base", "matplotlib"),
    ("pytables", "tables"),
    ("scikit-image", "skimage"),
    ("scikit-learn", "sklearn"),
    // R
    ("randomforest", "randomForest"),
    ("rcurl", "RCurl"),
    ("rodbc", "RODBC"),
    ("rsqlite", "DBI"),
];

/// Packages that cannot be imported in a standard way.
pub const EXCLUDED_PACKAGES: &[&str] = &[
    "bzip2",
    "ca-certificates",
    "conda-forge::blas=*",
    "grpcio-status",
    "grpcio",
    "hdf5",
    "jupyterhub-singleuser",
    "jupyterlab-git",
    "mamba",
    "notebook>",
    "openssl",
    "protobuf",
    "python",
    "r-irkernel",
    "unixodbc",
];

/// One package to import inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCheck {
    pub package: String,
    pub module: String,
    pub is_r: bool,
}

impl ImportCheck {
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
            module: import_name(package),
            is_r: is_r_package(package),
        }
    }

    /// Shell command that exits non-zero when the import fails.
    pub fn command(&self) -> String {
        if self.is_r {
            format!("R --slave -e library({})", self.module)
        } else {
            format!("python -c \"import {}\"", self.module)
        }
    }
}

pub fn is_r_package(package: &str) -> bool {
    package.starts_with("r-")
}

/// Name used to import `package` from Python or R.
pub fn import_name(package: &str) -> String {
    let package = package.strip_prefix("r-").unwrap_or(package);
    PACKAGE_MAPPING
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, module)| module.to_string())
        .unwrap_or_else(|| package.to_string())
}

/// Checks for every package not on the exclusion list.
pub fn import_checks<'a>(packages: impl IntoIterator<Item = &'a String>) -> Vec<ImportCheck> {
    packages
        .into_iter()
        .filter(|p| !EXCLUDED_PACKAGES.contains(&p.as_str()))
        .map(|p| ImportCheck::new(p))
        .collect()
}
