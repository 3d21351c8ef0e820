//! Scripted in-memory [`Session`] implementation for engine tests.
//!
//! The fake models just enough of the portal to drive the wizard, the
//! location stage, and the week view: a fixed page title, a location
//! dropdown, and per-location sequences of scripted weeks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::selectors;
use crate::session::{LocationOption, Locator, Session, SessionError};

#[derive(Debug, Clone)]
enum SlotRead {
    Text(String),
    Broken,
}

/// One scripted week window.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeWeek {
    label: String,
    day_markers: Vec<String>,
    slots: Vec<(String, Vec<SlotRead>)>,
    no_timeslot_message: Option<String>,
    has_next: bool,
}

impl FakeWeek {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    /// Add a weekday column with the given bookable times.
    pub fn day(mut self, marker: &str, slots: &[&str]) -> Self {
        let abbr = marker_abbr(marker);
        self.day_markers.push(marker.to_string());
        self.slots.push((
            abbr,
            slots
                .iter()
                .map(|s| SlotRead::Text((*s).to_string()))
                .collect(),
        ));
        self
    }

    /// Append an unreadable slot element to an existing day.
    pub fn broken_slot(mut self, marker: &str) -> Self {
        let abbr = marker_abbr(marker);
        if let Some((_, slots)) = self.slots.iter_mut().find(|(a, _)| *a == abbr) {
            slots.push(SlotRead::Broken);
        }
        self
    }

    /// Show the no-timeslot modal with the given message on this week.
    pub fn no_slots(mut self, message: &str) -> Self {
        self.no_timeslot_message = Some(message.to_string());
        self
    }

    /// Make the next-week control clickable on this week.
    pub fn with_next(mut self) -> Self {
        self.has_next = true;
        self
    }
}

fn marker_abbr(marker: &str) -> String {
    marker
        .trim()
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .take(3)
        .collect::<String>()
        .to_ascii_lowercase()
}

#[derive(Debug, Default)]
struct FakeState {
    title: String,
    options: Vec<LocationOption>,
    known_locations: Option<Vec<String>>,
    location_weeks: Vec<(String, Vec<FakeWeek>)>,
    weeks: Vec<FakeWeek>,
    week_index: usize,
    stage_lost: bool,
    fail_clicks: Vec<String>,
    navigations: Vec<String>,
    clicks: Vec<String>,
    typed: Vec<(String, String)>,
    selected: Vec<String>,
    enumerations: usize,
}

pub(crate) struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    close_count: Arc<AtomicUsize>,
}

pub(crate) struct FakeSessionBuilder {
    state: FakeState,
}

impl FakeSessionBuilder {
    pub fn title(mut self, title: &str) -> Self {
        self.state.title = title.to_string();
        self
    }

    pub fn option(mut self, text: &str, enabled: bool) -> Self {
        self.state.options.push(LocationOption {
            text: text.to_string(),
            enabled,
        });
        self
    }

    /// Restrict which names the dropdown accepts; selecting any other name
    /// fails like a stale option source would.
    pub fn known_locations(mut self, names: &[&str]) -> Self {
        self.state.known_locations = Some(names.iter().map(|n| (*n).to_string()).collect());
        self
    }

    /// Script the week sequence shown after selecting `location`.
    pub fn location_weeks(mut self, location: &str, weeks: Vec<FakeWeek>) -> Self {
        self.state
            .location_weeks
            .push((location.to_string(), weeks));
        self
    }

    /// Script the week sequence shown regardless of selected location.
    pub fn week(mut self, week: FakeWeek) -> Self {
        self.state.weeks.push(week);
        self
    }

    /// Make the choose-another-location link permanently unavailable.
    pub fn stage_lost(mut self) -> Self {
        self.state.stage_lost = true;
        self
    }

    /// Make clicks on the given control time out.
    pub fn fail_click(mut self, locator: &Locator) -> Self {
        self.state.fail_clicks.push(locator.to_string());
        self
    }

    pub fn build(self) -> FakeSession {
        FakeSession {
            state: Arc::new(Mutex::new(self.state)),
            close_count: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl FakeSession {
    pub fn builder() -> FakeSessionBuilder {
        FakeSessionBuilder {
            state: FakeState {
                title: "MyRTA".to_string(),
                ..FakeState::default()
            },
        }
    }

    /// Shared close counter, usable after the session has been consumed.
    pub fn close_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.close_count)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn typed(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn selected(&self) -> Vec<String> {
        self.state.lock().unwrap().selected.clone()
    }

    pub fn enumerations(&self) -> usize {
        self.state.lock().unwrap().enumerations
    }

    /// Zero-based index of the week window currently shown.
    pub fn week_position(&self) -> usize {
        self.state.lock().unwrap().week_index
    }

    fn timeout(locator: &Locator) -> SessionError {
        SessionError::Timeout {
            locator: locator.to_string(),
        }
    }
}

impl Session for FakeSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.state.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn wait_present(&self, locator: &Locator) -> Result<(), SessionError> {
        let state = self.state.lock().unwrap();
        if matches!(locator, Locator::XPath(x) if x == selectors::WEEK_TITLE_XPATH)
            && state.weeks.is_empty()
        {
            return Err(Self::timeout(locator));
        }
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        let key = locator.to_string();
        if state.fail_clicks.contains(&key) {
            return Err(Self::timeout(locator));
        }
        if matches!(locator, Locator::Id(id) if id == selectors::NEXT_WEEK_BUTTON_ID) {
            let index = state.week_index;
            let advance = state.weeks.get(index).is_some_and(|w| w.has_next);
            if !advance {
                return Err(Self::timeout(locator));
            }
            state.week_index += 1;
        }
        if matches!(locator, Locator::Id(id) if id == selectors::ANOTHER_LOCATION_LINK_ID)
            && state.stage_lost
        {
            return Err(Self::timeout(locator));
        }
        state.clicks.push(key);
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), SessionError> {
        self.state
            .lock()
            .unwrap()
            .typed
            .push((locator.to_string(), text.to_string()));
        Ok(())
    }

    async fn select_by_visible_text(
        &self,
        locator: &Locator,
        text: &str,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        if let Some(known) = &state.known_locations {
            if !known.iter().any(|k| k == text) {
                return Err(SessionError::NotFound {
                    locator: format!("{locator} option \"{text}\""),
                });
            }
        }
        let scripted = state
            .location_weeks
            .iter()
            .find(|(name, _)| name == text)
            .map(|(_, weeks)| weeks.clone());
        if let Some(weeks) = scripted {
            state.weeks = weeks;
        }
        state.week_index = 0;
        state.selected.push(text.to_string());
        Ok(())
    }

    async fn select_options(
        &self,
        _locator: &Locator,
    ) -> Result<Vec<LocationOption>, SessionError> {
        let mut state = self.state.lock().unwrap();
        state.enumerations += 1;
        Ok(state.options.clone())
    }

    async fn read_text(&self, locator: &Locator) -> Result<String, SessionError> {
        let state = self.state.lock().unwrap();
        if matches!(locator, Locator::XPath(x) if x == selectors::WEEK_TITLE_XPATH) {
            return state
                .weeks
                .get(state.week_index)
                .map(|w| w.label.clone())
                .ok_or_else(|| Self::timeout(locator));
        }
        Err(Self::timeout(locator))
    }

    async fn read_texts(
        &self,
        locator: &Locator,
    ) -> Result<Vec<Result<String, SessionError>>, SessionError> {
        let state = self.state.lock().unwrap();
        let Some(week) = state.weeks.get(state.week_index) else {
            return Ok(Vec::new());
        };
        match locator {
            Locator::XPath(x) if x == selectors::DAY_LABEL_XPATH => {
                Ok(week.day_markers.iter().cloned().map(Ok).collect())
            }
            Locator::XPath(x) if x == selectors::NO_TIMESLOT_DIALOG_XPATH => Ok(week
                .no_timeslot_message
                .iter()
                .cloned()
                .map(Ok)
                .collect()),
            Locator::Css(css) => {
                let abbr = css
                    .strip_prefix("td.rms_")
                    .and_then(|rest| rest.strip_suffix(" a.available"));
                let Some(abbr) = abbr else {
                    return Ok(Vec::new());
                };
                let reads = week
                    .slots
                    .iter()
                    .find(|(a, _)| a == abbr)
                    .map(|(_, slots)| {
                        slots
                            .iter()
                            .map(|slot| match slot {
                                SlotRead::Text(t) => Ok(t.clone()),
                                SlotRead::Broken => Err(SessionError::Stale {
                                    locator: locator.to_string(),
                                }),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(reads)
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn title(&self) -> Result<String, SessionError> {
        Ok(self.state.lock().unwrap().title.clone())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok("https://portal.example/current".to_string())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        Ok("<html>scripted</html>".to_string())
    }

    async fn close(self) -> Result<(), SessionError> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
