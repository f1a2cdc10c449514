//! Parallel comparison fetch across selected saved locations.
//!
//! Batches are all-or-nothing: one hard failure fails the whole batch, and
//! there is no per-call cache fallback. A batch commits only when the
//! selection that triggered it is still current.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::future::join_all;

use pulse_api::types::SavedLocation;

use crate::fetch::DashboardService;
use crate::state::CompareEntry;

impl DashboardService {
    /// React to a change in the comparison selection or the saved-location
    /// list. `selected_ids` drives membership: entries for ids that left
    /// the selection disappear with the batch they are absent from, and an
    /// in-flight batch superseded by a later change never commits.
    pub fn update_comparison(
        self: &Arc<Self>,
        selected_ids: Vec<i64>,
        saved: Vec<SavedLocation>,
    ) {
        let generation = self.compare_generation.fetch_add(1, Ordering::SeqCst) + 1;

        if selected_ids.is_empty() {
            let mut state = self.state.write();
            state.compare.entries.clear();
            state.compare.error = None;
            state.compare.loading = false;
            return;
        }

        let selected: Vec<SavedLocation> = saved
            .into_iter()
            .filter(|location| selected_ids.contains(&location.id))
            .collect();

        {
            let mut state = self.state.write();
            state.compare.loading = true;
            state.compare.error = None;
        }

        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.run_compare_batch(selected, generation).await;
        });
    }

    fn compare_is_current(&self, generation: u64) -> bool {
        self.compare_generation.load(Ordering::SeqCst) == generation
    }

    async fn run_compare_batch(&self, selected: Vec<SavedLocation>, generation: u64) {
        let fetches = selected.into_iter().map(|location| async move {
            let weather = self.api.weather_by_city(&location.name).await?;
            let id = location.id;
            Ok::<_, pulse_api::ApiError>((id, CompareEntry { location, weather }))
        });

        let mut entries = HashMap::new();
        let mut failure = None;
        for result in join_all(fetches).await {
            match result {
                Ok((id, entry)) => {
                    entries.insert(id, entry);
                }
                Err(reason) => {
                    failure = Some(reason.message().to_string());
                }
            }
        }

        // A later selection change owns the slice now; drop this batch.
        // Checked under the lock: supersede paths bump the generation
        // before they touch state, so a stale batch can never overwrite a
        // successor's write.
        let mut state = self.state.write();
        if !self.compare_is_current(generation) {
            return;
        }
        state.compare.loading = false;
        match failure {
            Some(message) => {
                state.compare.error = Some(message);
            }
            None => {
                state.compare.entries = entries;
                state.compare.error = None;
            }
        }
    }
}
