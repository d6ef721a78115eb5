//! Dashboard - ties the registry, clocks and transition tracking together
//!
//! `render` derives the full view for the current effective instant. It is
//! cheap enough to call on every tick.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tracing::{info, warn};

use meridian_core::{
    default_zones, is_known_zone, EntryId, MeridianResult, SearchResult, TimeFormat, TimeZoneEntry,
};
use meridian_state::{ChangeDetector, KeyValueStore, ZoneRegistry};
use meridian_time::{
    offset_label, selection_label, DayContext, DayContextResolver, LocalTimeFormatter,
    OffsetClock, SystemTimeSource, TimeSource, TzFormatter, ZoneClock, ZoneDisplayFacts,
};

use crate::{resolve_zone, ClockService, DashboardConfig, Tick, TransitionTimers, ZoneLookup};

/// Region shown for entries without a country
pub const GLOBAL_REGION: &str = "Global";

/// Everything one clock card shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneCard {
    pub entry: TimeZoneEntry,
    pub facts: ZoneDisplayFacts,
    /// Minute digits changed within the transition window
    pub is_transitioning: bool,
    /// User is scrubbing the offset control
    pub is_dimmed: bool,
    /// First card in the list
    pub is_anchor: bool,
    pub region_label: String,
}

impl ZoneCard {
    pub fn day_context(&self) -> Option<DayContext> {
        self.facts.day_context
    }
}

/// One rendered frame of the dashboard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardView {
    pub cards: Vec<ZoneCard>,
    pub now: DateTime<Utc>,
    pub effective_instant: DateTime<Utc>,
    pub offset_minutes: i32,
    /// "PRESENT", "+2H 30M", ...
    pub offset_label: String,
    /// Viewer-local target of the offset; `None` in the present
    pub selection_label: Option<String>,
    pub is_time_travelling: bool,
    pub is_scrubbing: bool,
    pub format: TimeFormat,
}

impl DashboardView {
    /// No zones registered
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn anchor(&self) -> Option<&ZoneCard> {
        self.cards.first()
    }

    pub fn card(&self, id: &EntryId) -> Option<&ZoneCard> {
        self.cards.iter().find(|c| &c.entry.id == id)
    }
}

/// World-clock dashboard
pub struct Dashboard<S, F = TzFormatter, T = SystemTimeSource> {
    registry: ZoneRegistry<S>,
    zone_clock: ZoneClock<Arc<F>>,
    resolver: DayContextResolver<Arc<F>>,
    service: ClockService<T>,
    detector: Arc<Mutex<ChangeDetector>>,
    timers: TransitionTimers,
    format: TimeFormat,
    rng: StdRng,
    config: DashboardConfig,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Dashboard on the system clock, viewer zone from the config or the host
    pub fn new(store: S, config: DashboardConfig) -> MeridianResult<Self> {
        let formatter = match &config.viewer_zone {
            Some(zone) => TzFormatter::new(zone.clone()),
            None => TzFormatter::detect(),
        };
        Self::with_parts(store, formatter, SystemTimeSource, config)
    }
}

impl<S, F, T> Dashboard<S, F, T>
where
    S: KeyValueStore,
    F: LocalTimeFormatter,
    T: TimeSource + 'static,
{
    /// Dashboard over explicit collaborators
    pub fn with_parts(store: S, formatter: F, source: T, config: DashboardConfig) -> MeridianResult<Self> {
        config.validate()?;

        let registry = ZoneRegistry::load_with_key(
            store,
            config.storage_key.clone(),
            default_zones(formatter.viewer_zone()),
        );
        let formatter = Arc::new(formatter);
        let clock = OffsetClock::with_source(source, config.offset.clone());
        let detector = Arc::new(Mutex::new(ChangeDetector::new()));
        let timers = TransitionTimers::new(Arc::clone(&detector), config.transition.window);

        info!(
            zones = registry.len(),
            origin = ?registry.origin(),
            viewer = formatter.viewer_zone(),
            "dashboard ready"
        );

        Ok(Dashboard {
            registry,
            zone_clock: ZoneClock::new(Arc::clone(&formatter)),
            resolver: DayContextResolver::new(formatter),
            service: ClockService::new(clock),
            detector,
            timers,
            format: config.format,
            rng: StdRng::from_entropy(),
            config,
        })
    }

    /// Replace the id generator
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Start the once-per-tick refresh. Returns false if already running.
    pub fn start(&mut self) -> MeridianResult<bool> {
        self.service.start()
    }

    /// Stop ticking and drop pending transition timers
    pub fn stop(&mut self) -> bool {
        self.timers.cancel_all();
        self.service.stop()
    }

    pub fn is_running(&self) -> bool {
        self.service.is_running()
    }

    /// Notified after every refresh and offset change
    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        self.service.subscribe()
    }

    /// Refresh real time now and render
    pub fn tick(&self) -> DashboardView {
        self.service.refresh_now();
        self.render()
    }

    /// Derive the view for the current effective instant.
    ///
    /// Each card's minute digits are fed to the change detector, so a card
    /// whose minute changed since the previous render is transitioning.
    pub fn render(&self) -> DashboardView {
        let (now, effective, offset_minutes, is_scrubbing) = self.service.with_clock(|clock| {
            (
                clock.now(),
                clock.effective_instant(),
                clock.offset_minutes(),
                clock.is_scrubbing(),
            )
        });
        let viewer_date = self.resolver.viewer_date(now);

        let cards = self
            .registry
            .all()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let day_context = viewer_date
                    .and_then(|date| self.resolver.resolve_against(effective, &entry.zone_id, date));
                let facts = self
                    .zone_clock
                    .derive_facts(effective, &entry.zone_id, self.format)
                    .with_day_context(day_context);

                let ticket = self.detector.lock().observe(&entry.id, &facts.minute_digits);
                if let Some(ticket) = ticket {
                    self.timers.schedule(ticket);
                }
                let is_transitioning = self.detector.lock().is_transitioning(&entry.id);

                ZoneCard {
                    region_label: region_label(entry),
                    entry: entry.clone(),
                    facts,
                    is_transitioning,
                    is_dimmed: is_scrubbing,
                    is_anchor: index == 0,
                }
            })
            .collect();

        DashboardView {
            cards,
            now,
            effective_instant: effective,
            offset_minutes,
            offset_label: offset_label(offset_minutes),
            selection_label: selection_label(self.zone_clock.formatter(), now, offset_minutes),
            is_time_travelling: offset_minutes != 0,
            is_scrubbing,
            format: self.format,
        }
    }

    /// Register a resolved search result under a fresh id
    pub fn add_zone(&mut self, result: &SearchResult) -> EntryId {
        if !is_known_zone(&result.zone_id) {
            warn!(zone = %result.zone_id, "zone not in catalog, card will show placeholder time");
        }
        let id = self.registry.add_result(result, &mut self.rng);
        info!(id = %id, zone = %result.zone_id, city = %result.city, "zone added");
        id
    }

    /// Resolve `zone_id` through `lookup` and register it
    pub async fn add_zone_id<L>(&mut self, zone_id: &str, lookup: &L) -> EntryId
    where
        L: ZoneLookup + ?Sized,
    {
        let result = resolve_zone(lookup, zone_id).await;
        self.add_zone(&result)
    }

    /// Remove a zone and its transition state. Unknown ids change nothing.
    pub fn remove_zone(&mut self, id: &EntryId) -> Option<TimeZoneEntry> {
        let removed = self.registry.remove(id);
        self.timers.cancel(id);
        self.detector.lock().forget(id);
        if let Some(entry) = &removed {
            info!(id = %id, zone = %entry.zone_id, "zone removed");
        }
        removed
    }

    /// Returns the offset actually applied
    pub fn set_offset(&self, minutes: i32) -> i32 {
        self.service.update(|clock| clock.set_offset(minutes))
    }

    /// Returns the offset actually applied
    pub fn update_offset<U>(&self, update: U) -> i32
    where
        U: FnOnce(i32) -> i32,
    {
        self.service.update(|clock| clock.update_offset(update))
    }

    pub fn reset_offset(&self) {
        self.service.update(|clock| clock.reset_offset());
    }

    pub fn set_scrubbing(&self, scrubbing: bool) {
        self.service.update(|clock| clock.set_scrubbing(scrubbing));
    }

    pub fn set_format(&mut self, format: TimeFormat) {
        self.format = format;
    }

    pub fn format(&self) -> TimeFormat {
        self.format
    }

    pub fn zones(&self) -> &[TimeZoneEntry] {
        self.registry.all()
    }

    pub fn registry(&self) -> &ZoneRegistry<S> {
        &self.registry
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}

fn region_label(entry: &TimeZoneEntry) -> String {
    entry
        .country
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(GLOBAL_REGION)
        .to_string()
}
