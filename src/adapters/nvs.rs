//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] for the security panel. The whole
//! [`SystemConfig`] is stored as one `postcard` blob under
//! `secpanel/syscfg`.
//!
//! - Config validation: [`SystemConfig::validate`] runs before every
//!   save and after every load, so a blob written by an older firmware
//!   with out-of-range values is reported instead of used.
//! - Atomic writes: ESP-IDF NVS commits are atomic per `nvs_commit()`.

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;
use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const CONFIG_NAMESPACE: &[u8] = b"secpanel\0";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &[u8] = b"syscfg\0";

/// Upper bound on the stored blob; anything larger is treated as corrupt.
const MAX_BLOB_SIZE: usize = 256;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    blob: std::cell::RefCell<Option<Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// Returns `Err(ConfigError::IoError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32
            {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as i32 {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as i32 {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK as i32 {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
            Ok(Self {})
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("NvsAdapter: simulation backend");
            Ok(Self {
                blob: std::cell::RefCell::new(None),
            })
        }
    }

    /// Open the config namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: namespace is NUL-terminated; handle is a valid out-pointer.
        let ret = unsafe { nvs_open(CONFIG_NAMESPACE.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: handle was opened above and is not used after this.
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        let result = Self::with_nvs_handle(false, |handle| {
            let mut size: usize = 0;
            // SAFETY: size query with a null buffer.
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    CONFIG_KEY.as_ptr().cast(),
                    core::ptr::null_mut(),
                    &mut size,
                )
            };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            if size == 0 || size > MAX_BLOB_SIZE {
                return Err(ESP_ERR_NVS_INVALID_LENGTH as i32);
            }

            let mut buf = vec![0u8; size];
            // SAFETY: buf has exactly `size` bytes.
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    CONFIG_KEY.as_ptr().cast(),
                    buf.as_mut_ptr().cast(),
                    &mut size,
                )
            };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            Ok(buf)
        });

        match result {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND as i32 => Ok(None),
            Err(e) if e == ESP_ERR_NVS_INVALID_LENGTH as i32 => Err(ConfigError::Corrupted),
            Err(e) => {
                warn!("NvsAdapter: NVS read error {}", e);
                Err(ConfigError::IoError)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_blob(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        Ok(self.blob.borrow().clone())
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(&self, bytes: &[u8]) -> Result<(), ConfigError> {
        let result = Self::with_nvs_handle(true, |handle| {
            // SAFETY: key is NUL-terminated; bytes is valid for its length.
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    CONFIG_KEY.as_ptr().cast(),
                    bytes.as_ptr().cast(),
                    bytes.len(),
                )
            };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            // SAFETY: commit on the handle opened above.
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            Ok(())
        });
        match result {
            Ok(()) => Ok(()),
            Err(e) if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE as i32 => Err(ConfigError::StorageFull),
            Err(e) => {
                warn!("NvsAdapter: NVS write error {}", e);
                Err(ConfigError::IoError)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_blob(&self, bytes: &[u8]) -> Result<(), ConfigError> {
        *self.blob.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }

    /// Overwrite the stored blob with arbitrary bytes (corruption tests).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_put_raw(&self, bytes: &[u8]) {
        *self.blob.borrow_mut() = Some(bytes.to_vec());
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let Some(bytes) = self.read_blob()? else {
            info!("NvsAdapter: no stored config, using defaults");
            return Ok(SystemConfig::default());
        };
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::Corrupted);
        }
        let cfg: SystemConfig = postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(&bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
