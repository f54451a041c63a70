//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the cycle loop stops feeding it. The timeout is
//! derived from the cycle interval so a long configured cadence does not
//! trip the watchdog while the loop is legitimately waiting.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

/// Extra time on top of two cycle intervals before the watchdog fires.
const TIMEOUT_MARGIN_MS: u32 = 5_000;

/// Watchdog timeout for a given cycle interval.
pub fn timeout_for_cycle(cycle_interval_ms: u32) -> u32 {
    cycle_interval_ms
        .saturating_mul(2)
        .saturating_add(TIMEOUT_MARGIN_MS)
}

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT reconfigure/add are called once from the main
            // task before the cycle loop starts.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK as i32 {
                    warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK as i32;
                if subscribed {
                    info!(
                        "Watchdog: subscribed ({} ms timeout, panic on trigger)",
                        timeout_ms
                    );
                } else {
                    warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    subscribed,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("Watchdog(sim): no-op ({} ms timeout)", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feed the watchdog. Must be called at least once per timeout.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the calling task's TWDT entry only.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
