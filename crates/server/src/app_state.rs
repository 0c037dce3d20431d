use std::sync::Arc;

use cabinet_core::{CabinetController, CabinetDevices};
use forecast::ForecastSettings;
use hardware::simulated::{RandomMatcher, SimulatedCamera, SimulatedLock};
use storage::seed;

use crate::config::Settings;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) controller: Arc<CabinetController>,
    pub(crate) forecast: ForecastSettings,
}

impl AppState {
    /// Controller wired to the in-process camera, matcher and lock, stocked
    /// from the seed fixtures.
    pub(crate) fn simulated(settings: &Settings) -> Self {
        let devices = CabinetDevices {
            camera: Arc::new(SimulatedCamera::new()),
            matcher: Arc::new(RandomMatcher::new(
                seed::enrolled_subjects(),
                settings.recognition_latency(),
            )),
            lock: Arc::new(SimulatedLock::new()),
        };
        Self {
            controller: CabinetController::new(
                settings.controller_settings(),
                devices,
                seed::initial_stock(),
            ),
            forecast: settings.forecast_settings(),
        }
    }
}
