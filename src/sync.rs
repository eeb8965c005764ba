//! Text ⇄ map synchronization.
//!
//! [`Synchronizer`] owns a [`MapView`] and a [`TextSurface`] and keeps them
//! consistent. Each call applies one direction only:
//!
//! - [`Synchronizer::text_to_map`] re-parses the text when it changed and
//!   replaces the rendered features
//! - [`Synchronizer::map_to_text`] serializes the first feature back to text
//!
//! A failed parse never touches the rendered features.

use tracing::{debug, info};

use crate::geometry::{Delimiter, Geometry, WktError, WktWriter, parse_lenient, parse_strict};
use crate::map::{FeatureId, FeatureStyle, MapEvent, MapListener, MapView, Renderable};

/// Shown on a fresh start when there is no text yet.
pub const SAMPLE_WKT: &str = "MULTIPOLYGON (((40 40, 20 45, 45 30, 40 40)), \
((20 35, 10 30, 10 10, 30 5, 45 20, 20 35), (30 20, 20 15, 20 25, 30 20)))";

/// A read/write text field holding WKT.
pub trait TextSurface {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
}

impl TextSurface for String {
    fn text(&self) -> String {
        self.clone()
    }

    fn set_text(&mut self, text: &str) {
        text.clone_into(self);
    }
}

/// Options for [`Synchronizer::text_to_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Whether the rendered features accept vertex drags.
    pub editable: bool,
    /// Whether to move the view onto the new features.
    pub focus: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            editable: true,
            focus: false,
        }
    }
}

/// Result of [`Synchronizer::text_to_map`].
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The text matched the last synchronized text; nothing was done.
    Unchanged,
    /// The text parsed and its features replaced the previous ones.
    Rendered(Renderable),
    /// The text did not parse, even leniently. Features were left alone.
    Rejected(WktError),
}

/// Which parse stage accepted the text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseAttempt {
    Strict(Geometry),
    Lenient(Geometry),
    Failed(WktError),
}

/// Parse strictly, then retry once with line breaks and tabs stripped.
pub fn parse_with_fallback(text: &str) -> ParseAttempt {
    match parse_strict(text) {
        Ok(geometry) => ParseAttempt::Strict(geometry),
        Err(strict_err) => {
            debug!(error = %strict_err, "strict parse failed, retrying leniently");
            match parse_lenient(text) {
                Ok(geometry) => ParseAttempt::Lenient(geometry),
                Err(err) => ParseAttempt::Failed(err),
            }
        }
    }
}

/// Parse `text` with [`parse_with_fallback`] and write it back in compact form.
///
/// # Errors
///
/// Returns the [`WktError`] when neither parse stage accepts the text.
pub fn normalize_wkt(text: &str, url_safe: bool) -> Result<String, WktError> {
    let geometry = match parse_with_fallback(text) {
        ParseAttempt::Strict(geometry) | ParseAttempt::Lenient(geometry) => geometry,
        ParseAttempt::Failed(err) => return Err(err),
    };
    Ok(WktWriter::new(Delimiter::from_url_safe(url_safe)).write(&geometry))
}

/// Keeps a text surface and a map view in agreement.
#[derive(Debug)]
pub struct Synchronizer<V, T> {
    view: V,
    text: T,
    features: Vec<FeatureId>,
    last_text: String,
    last_error: Option<WktError>,
    style: FeatureStyle,
    options: SyncOptions,
}

impl<V: MapView, T: TextSurface> Synchronizer<V, T> {
    pub fn new(view: V, text: T) -> Self {
        Self {
            view,
            text,
            features: Vec::new(),
            last_text: String::new(),
            last_error: None,
            style: FeatureStyle::default(),
            options: SyncOptions::default(),
        }
    }

    /// Base style for new features; `editable` is overridden per sync.
    #[must_use]
    pub const fn with_style(mut self, style: FeatureStyle) -> Self {
        self.style = style;
        self
    }

    /// Options used when a map event triggers a sync.
    #[must_use]
    pub const fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub const fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub const fn text_surface(&self) -> &T {
        &self.text
    }

    pub const fn text_surface_mut(&mut self) -> &mut T {
        &mut self.text
    }

    /// Handles of the displayed features in insertion order.
    pub fn features(&self) -> &[FeatureId] {
        &self.features
    }

    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    /// Why the current text was rejected, if it was.
    pub const fn last_error(&self) -> Option<&WktError> {
        self.last_error.as_ref()
    }

    pub const fn options(&self) -> SyncOptions {
        self.options
    }

    /// Parse the text and render it, unless it is unchanged since the last sync.
    pub fn text_to_map(&mut self, options: SyncOptions) -> SyncOutcome {
        let _scope = crate::perf::scope("sync.text_to_map");
        let current = self.text.text();
        if current == self.last_text {
            return SyncOutcome::Unchanged;
        }
        self.last_text.clone_from(&current);

        let geometry = match parse_with_fallback(&current) {
            ParseAttempt::Strict(geometry) => geometry,
            ParseAttempt::Lenient(geometry) => {
                info!("accepted WKT after stripping line breaks and tabs");
                geometry
            }
            ParseAttempt::Failed(err) => {
                debug!(error = %err, "could not parse WKT");
                self.last_error = Some(err.clone());
                return SyncOutcome::Rejected(err);
            }
        };
        self.last_error = None;

        let style = self.style.with_editable(options.editable);
        let renderable = Renderable::from_geometry(geometry);

        self.remove_all_features();
        let leaves = renderable.direct_leaves();
        for leaf in &leaves {
            let id = self.view.add_feature((*leaf).clone(), &style);
            self.features.push(id);
        }
        if renderable.is_group() {
            debug!(
                leaves = leaves.len(),
                skipped = match &renderable {
                    Renderable::Group(items) => items.len() - leaves.len(),
                    Renderable::Leaf(_) => 0,
                },
                "rendered multi-geometry"
            );
        }

        if options.focus {
            self.focus_on(&renderable);
        }
        crate::perf::log_event("sync.render", format!("features={}", self.features.len()));

        SyncOutcome::Rendered(renderable)
    }

    fn focus_on(&mut self, renderable: &Renderable) {
        if let Renderable::Leaf(Geometry::Point(point)) = renderable {
            self.view.pan_to(*point);
            return;
        }
        match renderable.bounds() {
            Some(bounds) if bounds.is_point() => self.view.pan_to(bounds.min),
            Some(bounds) => self.view.fit_bounds(bounds),
            None => {}
        }
    }

    /// Write the first feature's current geometry back to the text.
    ///
    /// Only the first feature is serialized; the others of a
    /// multi-geometry are not written. Returns `false` when there are no
    /// features.
    pub fn map_to_text(&mut self) -> bool {
        let Some(geometry) = self
            .features
            .first()
            .and_then(|id| self.view.feature_geometry(*id))
        else {
            return false;
        };
        let wkt = WktWriter::default().write(geometry);
        if self.features.len() > 1 {
            debug!(
                features = self.features.len(),
                "only the first feature is written back"
            );
        }
        self.text.set_text(&wkt);
        self.last_text = wkt;
        self.last_error = None;
        true
    }

    /// Remove every feature and forget the last synchronized text.
    pub fn clear(&mut self) {
        self.remove_all_features();
        self.last_text.clear();
        self.last_error = None;
    }

    /// Empty the text. Features stay on the map.
    pub fn clear_text(&mut self) {
        self.text.set_text("");
    }

    /// Rewrite the text with `+` (URL-safe) or space coordinate delimiters.
    ///
    /// # Errors
    ///
    /// Returns the [`WktError`] when the text is not valid WKT; the text is
    /// left unchanged.
    pub fn format_for_transport(&mut self, url_safe: bool) -> Result<Geometry, WktError> {
        let geometry = parse_strict(&self.text.text())?;
        let writer = WktWriter::new(Delimiter::from_url_safe(url_safe));
        self.text.set_text(&writer.write(&geometry));
        Ok(geometry)
    }

    fn remove_all_features(&mut self) {
        for id in self.features.drain(..) {
            self.view.remove_feature(id);
        }
    }
}

impl<V: MapView, T: TextSurface> MapListener for Synchronizer<V, T> {
    fn on_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::Loaded => {
                if self.text.text().is_empty() {
                    self.text.set_text(SAMPLE_WKT);
                }
                let outcome = self.text_to_map(self.options);
                if let SyncOutcome::Rejected(err) = outcome {
                    info!(error = %err, "initial text is not valid WKT");
                }
            }
            MapEvent::EditFinished => {
                self.map_to_text();
            }
        }
    }
}
