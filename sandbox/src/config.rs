//! Sandbox configuration.

/// Size of one WebAssembly page.
pub const WASM_PAGE_SIZE: u64 = 65536;

/// Configuration for the WASM sandbox.
///
/// Controls the guest memory ceiling, optional instruction fuel, and the
/// WASI surface handed to each instance.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Maximum linear memory pages (1 page = 64 KiB).
    /// Default: 32768 pages = 2 GiB. The model payload alone is tens of MiB
    /// and the guest decodes the graph into its own heap.
    pub max_memory_pages: u32,

    /// Wasmtime fuel limit (instruction metering). `None` runs unmetered.
    pub fuel_limit: Option<u64>,

    /// Whether the guest's stdin/stdout/stderr are the host's.
    pub inherit_stdio: bool,
}

impl SandboxConfig {
    /// Memory ceiling in bytes.
    pub fn max_memory_bytes(&self) -> usize {
        (self.max_memory_pages as u64 * WASM_PAGE_SIZE) as usize
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_memory_pages: 32768, // 2 GiB
            fuel_limit: None,
            inherit_stdio: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SandboxConfig::default();
        assert_eq!(config.max_memory_pages, 32768);
        assert_eq!(config.fuel_limit, None);
        assert!(config.inherit_stdio);
    }

    #[test]
    fn test_max_memory_bytes() {
        let config = SandboxConfig {
            max_memory_pages: 2,
            ..SandboxConfig::default()
        };
        assert_eq!(config.max_memory_bytes(), 131072);
    }
}
