//! Debounced, cancellable search-as-you-type pipeline.
//!
//! Each keystroke supersedes the previous cycle: the debounce timer and any
//! in-flight lookups are cancelled, and a generation counter guarantees a
//! superseded cycle can never commit results even if its requests complete
//! after cancellation was requested. Correctness never depends on the
//! transport honoring the abort.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::fetch::DashboardService;

/// Minimum trimmed query length before any network traffic is issued.
const MIN_QUERY_LEN: usize = 2;

/// One autocomplete row; lives only for the cycle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionCandidate {
    /// `<lat>:<lon>` of the geocoding match.
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub admin1: Option<String>,
    pub temp: Option<f64>,
    pub feels: Option<f64>,
}

impl DashboardService {
    /// Feed one keystroke into the suggestion stream.
    ///
    /// Cancels any pending debounce or in-flight cycle. Queries shorter
    /// than two characters clear the suggestion list without issuing any
    /// network calls; everything else schedules a debounced lookup.
    pub fn update_query(self: &Arc<Self>, input: &str) {
        let term = input.trim().to_string();

        // Supersede whatever cycle is in flight.
        if let Some(token) = self.suggest_cancel.lock().take() {
            token.cancel();
        }
        let generation = self.suggest_generation.fetch_add(1, Ordering::SeqCst) + 1;

        if term.len() < MIN_QUERY_LEN {
            let mut state = self.state.write();
            state.suggest.items.clear();
            state.suggest.error = None;
            state.suggest.loading = false;
            return;
        }

        let token = CancellationToken::new();
        *self.suggest_cancel.lock() = Some(token.clone());

        let service = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(service.suggest_debounce) => {}
            }
            service.run_suggest_cycle(&term, generation, token).await;
        });
    }

    /// Cancel any in-flight cycle and clear the suggestion list, e.g. when
    /// the consuming view is torn down.
    pub fn cancel_suggestions(&self) {
        if let Some(token) = self.suggest_cancel.lock().take() {
            token.cancel();
        }
        self.suggest_generation.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.write();
        state.suggest.items.clear();
        state.suggest.error = None;
        state.suggest.loading = false;
    }

    fn suggest_is_current(&self, generation: u64) -> bool {
        self.suggest_generation.load(Ordering::SeqCst) == generation
    }

    async fn run_suggest_cycle(&self, term: &str, generation: u64, token: CancellationToken) {
        // Every generation check below happens while holding the state
        // lock: supersede paths bump the generation before they touch
        // state, so a check under the lock cannot pass for a cycle whose
        // successor already wrote.
        {
            let mut state = self.state.write();
            if !self.suggest_is_current(generation) {
                return;
            }
            state.suggest.loading = true;
            state.suggest.error = None;
        }

        let search = tokio::select! {
            _ = token.cancelled() => return,
            result = self.geo.search(term, self.suggest_limit) => result,
        };

        let matches = match search {
            Ok(matches) => matches,
            Err(reason) => {
                tracing::debug!("suggestion search failed: {}", reason);
                let mut state = self.state.write();
                if self.suggest_is_current(generation) {
                    state.suggest.items.clear();
                    state.suggest.error = Some("Unable to load suggestions.".to_string());
                    state.suggest.loading = false;
                }
                return;
            }
        };

        // Best-effort fan-out: one spot-forecast lookup per candidate, all
        // under the same token. A failed lookup drops its candidate only;
        // successful siblings are kept.
        let lookups = matches.into_iter().map(|candidate| {
            let token = token.clone();
            async move {
                tokio::select! {
                    _ = token.cancelled() => None,
                    conditions = self.geo.current_conditions(candidate.latitude, candidate.longitude) => {
                        let current = conditions.ok()?.current.unwrap_or_default();
                        Some(SuggestionCandidate {
                            id: format!("{}:{}", candidate.latitude, candidate.longitude),
                            name: candidate.name,
                            country: candidate.country,
                            admin1: candidate.admin1,
                            temp: current.temperature_2m,
                            feels: current.apparent_temperature,
                        })
                    }
                }
            }
        });
        let items: Vec<SuggestionCandidate> =
            join_all(lookups).await.into_iter().flatten().collect();

        // Stale-cycle check: only the still-current cycle may commit.
        let mut state = self.state.write();
        if token.is_cancelled() || !self.suggest_is_current(generation) {
            return;
        }
        state.suggest.items = items;
        state.suggest.error = None;
        state.suggest.loading = false;
    }
}
