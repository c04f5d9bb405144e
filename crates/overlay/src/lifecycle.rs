//! Overlay lifecycle: mount, update, unmount.
//!
//! State machine `Unmounted -> Mounted -> Unmounted` with no intermediate
//! states visible to callers. Mounting acquires exactly one overlay surface
//! and one viewport-change subscription; unmounting releases both on every
//! exit path, including drop.

use crate::filter;
use crate::host::{MapHost, SubscriptionGuard, SurfacePane};
use crate::render::GridRenderer;
use crate::source::ClimateDataSource;
use overlay_common::{ClimateSample, OverlayError, OverlayResult, RangeSelection};
use renderer::{CellLayout, EncodingConfig};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Configuration passed explicitly into [`mount`].
///
/// Everything tunable about the overlay travels through this struct; the
/// engine has no module-wide mutable defaults and no load-time side
/// effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub layout: CellLayout,
    #[serde(default)]
    pub encoding: EncodingConfig,
}

impl OverlayConfig {
    pub fn validate(&self) -> OverlayResult<()> {
        self.layout.validate().map_err(OverlayError::from)?;
        self.encoding.validate().map_err(OverlayError::from)?;
        Ok(())
    }
}

/// Latest inputs plus the renderer, shared with the viewport callback.
struct EngineState {
    host: Rc<dyn MapHost>,
    renderer: GridRenderer,
    samples: Vec<ClimateSample>,
    selection: RangeSelection,
}

impl EngineState {
    fn redraw(&mut self) {
        // Fresh viewport snapshot on every redraw, never cached across.
        let viewport = self.host.viewport();
        let filtered = filter::filter(&self.samples, &self.selection);
        self.renderer.render(&filtered, &viewport);
    }
}

/// Resources held only while mounted.
struct Mounted {
    state: Rc<RefCell<EngineState>>,
    subscription: SubscriptionGuard,
    pane: Rc<dyn SurfacePane>,
}

/// The overlay engine and its lifecycle state machine.
pub struct Overlay {
    host: Rc<dyn MapHost>,
    config: OverlayConfig,
    mounted: Option<Mounted>,
}

impl Overlay {
    pub fn new(host: Rc<dyn MapHost>, config: OverlayConfig) -> Self {
        Self {
            host,
            config,
            mounted: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Attach the overlay surface and subscribe to viewport changes.
    ///
    /// Fails with [`OverlayError::AlreadyMounted`] if called again without
    /// an intervening [`Overlay::unmount`].
    pub fn mount(&mut self) -> OverlayResult<()> {
        if self.mounted.is_some() {
            return Err(OverlayError::AlreadyMounted);
        }
        self.config.validate()?;

        let pane = self.host.pane();
        pane.attach();

        let state = Rc::new(RefCell::new(EngineState {
            host: Rc::clone(&self.host),
            renderer: GridRenderer::new(
                Rc::clone(&self.host),
                self.config.layout,
                self.config.encoding,
            ),
            samples: Vec::new(),
            selection: RangeSelection::default(),
        }));

        let weak: Weak<RefCell<EngineState>> = Rc::downgrade(&state);
        let pane_for_callback = Rc::clone(&pane);
        let id = self.host.subscribe_viewport(Box::new(move || {
            // A dead Weak means the overlay was unmounted; a host that
            // keeps firing after unsubscribe must never trigger a draw.
            let Some(state) = weak.upgrade() else {
                return;
            };
            let mut state = state.borrow_mut();
            state.redraw();
            pane_for_callback.present(state.renderer.surface());
        }));
        let subscription = SubscriptionGuard::new(Rc::clone(&self.host), id);

        // Initial paint, so mounting onto a live map shows current state.
        {
            let mut state = state.borrow_mut();
            state.redraw();
            pane.present(state.renderer.surface());
        }

        self.mounted = Some(Mounted {
            state,
            subscription,
            pane,
        });
        Ok(())
    }

    /// Store the latest samples and selection and repaint synchronously.
    ///
    /// Silent no-op when unmounted.
    pub fn update(&mut self, samples: Vec<ClimateSample>, selection: RangeSelection) {
        let Some(mounted) = &self.mounted else {
            debug!("update ignored: overlay not mounted");
            return;
        };
        let mut state = mounted.state.borrow_mut();
        state.samples = samples;
        state.selection = selection;
        state.redraw();
        mounted.pane.present(state.renderer.surface());
    }

    /// Pull the latest sample set from a data source and repaint.
    ///
    /// An empty pull and a not-yet-loaded source behave identically:
    /// render nothing.
    pub fn update_from_source(
        &mut self,
        source: &dyn ClimateDataSource,
        selection: RangeSelection,
    ) {
        self.update(source.samples(), selection);
    }

    /// Unsubscribe, detach the surface, and return to `Unmounted`.
    ///
    /// Idempotent: unmounting an unmounted overlay is a no-op.
    pub fn unmount(&mut self) {
        if let Some(mut mounted) = self.mounted.take() {
            mounted.subscription.release();
            mounted.pane.detach();
            // Dropping `state` here invalidates the Weak inside any
            // callback a misbehaving host failed to drop.
        }
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mount a new overlay onto the host and hand back its handle.
pub fn mount(host: Rc<dyn MapHost>, config: OverlayConfig) -> OverlayResult<OverlayHandle> {
    let mut overlay = Overlay::new(host, config);
    overlay.mount()?;
    Ok(OverlayHandle { overlay })
}

/// The embedding surface of a mounted overlay.
pub struct OverlayHandle {
    overlay: Overlay,
}

impl std::fmt::Debug for OverlayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayHandle")
            .field("mounted", &self.overlay.is_mounted())
            .finish()
    }
}

impl OverlayHandle {
    /// See [`Overlay::update`].
    pub fn update(&mut self, samples: Vec<ClimateSample>, selection: RangeSelection) {
        self.overlay.update(samples, selection);
    }

    /// See [`Overlay::update_from_source`].
    pub fn update_from_source(
        &mut self,
        source: &dyn ClimateDataSource,
        selection: RangeSelection,
    ) {
        self.overlay.update_from_source(source, selection);
    }

    /// See [`Overlay::unmount`].
    pub fn unmount(&mut self) {
        self.overlay.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.overlay.is_mounted()
    }
}
