use chrono::{DateTime, Duration, Utc};
use covidash_core::NotificationDescriptor;
use tracing::{debug, info, warn};

use crate::{
    engine::Scheduler,
    registry::{UpdateEntry, UpdateRegistry},
    types::{EventHandle, ScheduledAction, UpdateId, UpdateRequest},
};

/// Period of a repeating update.
pub const REPEAT_PERIOD: Duration = Duration::hours(24);

/// User-scheduled dashboard updates on top of the cooperative queue.
#[derive(Default)]
pub struct UpdateScheduler {
    queue: Scheduler<ScheduledAction>,
    registry: UpdateRegistry,
}

impl UpdateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an update and queue its actions.
    ///
    /// One-shot updates get their refreshes plus a self-removal, all at
    /// `request.delay`. Repeating updates get recurring refreshes at the same
    /// offset and a renewal timer every [`REPEAT_PERIOD`].
    pub fn register_update(&mut self, request: UpdateRequest, now: DateTime<Utc>) -> UpdateId {
        let id = UpdateId::new();
        let descriptor = descriptor_for(&request);
        let mut handles = Vec::with_capacity(3);

        let mut refreshes = Vec::with_capacity(2);
        if request.news {
            refreshes.push(ScheduledAction::RefreshNews);
        }
        if request.covid {
            refreshes.push(ScheduledAction::RefreshCovid);
        }

        if request.repeat {
            for action in refreshes {
                handles.push(self.queue.enter_recurring(
                    request.delay,
                    REPEAT_PERIOD,
                    action.priority(),
                    action,
                    now,
                ));
            }
            let renew = ScheduledAction::RenewCycle { update: id };
            handles.push(self.queue.enter_recurring(
                REPEAT_PERIOD,
                REPEAT_PERIOD,
                renew.priority(),
                renew,
                now,
            ));
        } else {
            for action in refreshes {
                handles.push(self.enter_once(&request, action, now));
            }
            let remove = ScheduledAction::RemoveCompleted { update: id };
            handles.push(self.enter_once(&request, remove, now));
        }

        if self.registry.find(&request.name).next().is_some() {
            // Same-name registrations are kept side by side.
            warn!(name = %request.name, "update name already registered");
        }
        info!(
            name = %request.name,
            update_id = %id,
            delay_secs = request.delay.num_seconds(),
            repeat = request.repeat,
            covid = request.covid,
            news = request.news,
            actions = handles.len(),
            "update registered"
        );

        self.registry.insert(UpdateEntry {
            id,
            descriptor,
            handles,
            request,
            cycle: 0,
        });
        id
    }

    /// Fire everything due at `now`.
    ///
    /// Removal and renewal are applied here; all fired actions (refreshes
    /// included) are returned in firing order for the caller to act on.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<ScheduledAction> {
        let fired = self.queue.run_pending(now);
        for action in &fired {
            match *action {
                ScheduledAction::RemoveCompleted { update } => {
                    self.remove_completed_update(update);
                }
                ScheduledAction::RenewCycle { update } => {
                    self.renew_cycle(update);
                }
                ScheduledAction::RefreshNews | ScheduledAction::RefreshCovid => {}
            }
        }
        if !fired.is_empty() {
            debug!(count = fired.len(), pending = self.queue.len(), "scheduler tick");
        }
        fired
    }

    /// Cancel and forget every update titled `name`.
    ///
    /// Handles that already fired cannot be cancelled; that is logged and
    /// otherwise ignored. Returns the number of entries removed.
    pub fn cancel_update(&mut self, name: &str) -> usize {
        let removed = self.registry.remove_by_name(name);
        if removed.is_empty() {
            info!(%name, "cancel requested for unknown update");
            return 0;
        }
        for entry in &removed {
            for (position, handle) in entry.handles.iter().enumerate() {
                match self.queue.cancel(*handle) {
                    Ok(()) => debug!(%name, %handle, position, "cancelled scheduled event"),
                    Err(e) => debug!(%name, %handle, position, "cannot cancel: {e}"),
                }
            }
        }
        info!(%name, entries = removed.len(), "update cancelled");
        removed.len()
    }

    /// Drop a one-shot update whose actions have all fired.
    ///
    /// Nothing is cancelled. Returns `false` when the entry is already gone
    /// (for instance, the user cancelled it first).
    pub fn remove_completed_update(&mut self, id: UpdateId) -> bool {
        match self.registry.remove(id) {
            Some(entry) => {
                info!(name = %entry.descriptor.title, update_id = %id, "completed update removed");
                true
            }
            None => {
                debug!(update_id = %id, "completed update already removed");
                false
            }
        }
    }

    /// Replace a repeating update's toast with a fresh, identical one for its
    /// next cycle. Queue handles are kept.
    pub fn renew_cycle(&mut self, id: UpdateId) -> bool {
        let Some(entry) = self.registry.get_mut(id) else {
            debug!(update_id = %id, "renewal for unknown update");
            return false;
        };
        entry.descriptor = descriptor_for(&entry.request);
        entry.cycle += 1;
        info!(name = %entry.descriptor.title, cycle = entry.cycle, "repeating update renewed");
        true
    }

    /// Toasts in registration order.
    pub fn notifications(&self) -> Vec<NotificationDescriptor> {
        self.registry.descriptors().cloned().collect()
    }

    pub fn entries(&self) -> &[UpdateEntry] {
        self.registry.entries()
    }

    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UpdateEntry> + 'a {
        self.registry.find(name)
    }

    pub fn is_pending(&self, handle: EventHandle) -> bool {
        self.queue.is_pending(handle)
    }

    /// Queued actions across all updates.
    pub fn pending_actions(&self) -> usize {
        self.queue.len()
    }

    pub fn next_fire_at(&self) -> Option<DateTime<Utc>> {
        self.queue.next_fire_at()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn enter_once(
        &mut self,
        request: &UpdateRequest,
        action: ScheduledAction,
        now: DateTime<Utc>,
    ) -> EventHandle {
        self.queue.enter(request.delay, action.priority(), action, now)
    }
}

fn descriptor_for(request: &UpdateRequest) -> NotificationDescriptor {
    NotificationDescriptor::for_update(
        &request.name,
        &request.label,
        request.covid,
        request.news,
        request.repeat,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 10, 28, 9, 0, 0).unwrap()
    }

    fn request(name: &str, delay_secs: i64, repeat: bool, covid: bool, news: bool) -> UpdateRequest {
        UpdateRequest {
            name: name.to_string(),
            label: "9:10".to_string(),
            delay: Duration::seconds(delay_secs),
            repeat,
            covid,
            news,
        }
    }

    #[test]
    fn nothing_fires_before_the_delay() {
        let mut s = UpdateScheduler::new();
        s.register_update(request("u", 600, false, true, true), t0());

        assert!(s.tick(t0()).is_empty());
        assert!(s.tick(t0() + Duration::seconds(599)).is_empty());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn one_shot_fires_requested_actions_in_order_then_disappears() {
        let mut s = UpdateScheduler::new();
        let id = s.register_update(request("u", 600, false, true, true), t0());
        assert_eq!(s.pending_actions(), 3);

        let fired = s.tick(t0() + Duration::seconds(600));
        assert_eq!(
            fired,
            vec![
                ScheduledAction::RefreshNews,
                ScheduledAction::RefreshCovid,
                ScheduledAction::RemoveCompleted { update: id },
            ]
        );
        assert!(s.is_empty());
        assert!(s.notifications().is_empty());
        assert_eq!(s.pending_actions(), 0);
    }

    #[test]
    fn only_selected_refreshes_are_queued() {
        let mut s = UpdateScheduler::new();
        let id = s.register_update(request("news-only", 5, false, false, true), t0());
        let fired = s.tick(t0() + Duration::seconds(5));
        assert_eq!(
            fired,
            vec![
                ScheduledAction::RefreshNews,
                ScheduledAction::RemoveCompleted { update: id },
            ]
        );

        let id = s.register_update(request("bare", 5, false, false, false), t0());
        let fired = s.tick(t0() + Duration::seconds(5));
        assert_eq!(fired, vec![ScheduledAction::RemoveCompleted { update: id }]);
    }

    #[test]
    fn descriptor_reflects_request() {
        let mut s = UpdateScheduler::new();
        s.register_update(request("daily", 60, true, true, false), t0());
        let toasts = s.notifications();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "daily");
        assert_eq!(toasts[0].content, "REPEATING: Updating covid at 9:10");
    }

    #[test]
    fn cancel_removes_pending_update_and_its_handles() {
        let mut s = UpdateScheduler::new();
        s.register_update(request("u", 600, false, true, true), t0());
        let handles = s.entries()[0].handles.clone();

        assert_eq!(s.cancel_update("u"), 1);
        assert!(s.is_empty());
        assert!(handles.iter().all(|h| !s.is_pending(*h)));
        assert!(s.tick(t0() + Duration::hours(1)).is_empty());
    }

    #[test]
    fn cancel_after_partial_firing_still_removes_entry() {
        let mut s = UpdateScheduler::new();
        s.register_update(request("u", 60, true, true, false), t0());

        // refresh fired, renewal still pending
        assert_eq!(s.tick(t0() + Duration::seconds(60)), vec![ScheduledAction::RefreshCovid]);
        assert_eq!(s.cancel_update("u"), 1);
        assert!(s.is_empty());
        assert_eq!(s.pending_actions(), 0);
    }

    #[test]
    fn cancel_unknown_name_is_noop() {
        let mut s = UpdateScheduler::new();
        s.register_update(request("u", 60, false, true, false), t0());
        assert_eq!(s.cancel_update("nope"), 0);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn remove_completed_after_cancel_is_harmless() {
        let mut s = UpdateScheduler::new();
        let id = s.register_update(request("u", 60, false, true, false), t0());
        s.cancel_update("u");
        assert!(!s.remove_completed_update(id));
    }

    #[test]
    fn repeating_update_renews_every_day_until_cancelled() {
        let mut s = UpdateScheduler::new();
        let id = s.register_update(request("daily", 60, true, true, true), t0());
        let first = s.notifications();

        let fired = s.tick(t0() + Duration::seconds(60));
        assert_eq!(fired, vec![ScheduledAction::RefreshNews, ScheduledAction::RefreshCovid]);
        assert_eq!(s.len(), 1, "repeating toast stays after firing");

        let fired = s.tick(t0() + REPEAT_PERIOD);
        assert_eq!(fired, vec![ScheduledAction::RenewCycle { update: id }]);
        assert_eq!(s.notifications(), first, "renewed toast is structurally identical");
        assert_eq!(s.entries()[0].cycle, 1);

        let fired = s.tick(t0() + REPEAT_PERIOD + Duration::seconds(60));
        assert_eq!(fired, vec![ScheduledAction::RefreshNews, ScheduledAction::RefreshCovid]);

        s.cancel_update("daily");
        assert!(s.tick(t0() + REPEAT_PERIOD * 3).is_empty());
    }

    #[test]
    fn repeating_update_never_queues_self_removal() {
        let mut s = UpdateScheduler::new();
        s.register_update(request("daily", 60, true, false, false), t0());
        assert_eq!(s.pending_actions(), 1);
        assert!(s
            .tick(t0() + Duration::seconds(60))
            .iter()
            .all(|a| !matches!(a, ScheduledAction::RemoveCompleted { .. })));
        assert_eq!(s.len(), 1);
    }

    // Same-name registrations are not deduplicated; both entries coexist and a
    // cancel by name takes them all.
    #[test]
    fn duplicate_names_accumulate() {
        let mut s = UpdateScheduler::new();
        let first = s.register_update(request("dup", 60, false, true, false), t0());
        s.register_update(request("dup", 120, false, false, true), t0());
        assert_eq!(s.len(), 2);
        assert_eq!(s.find("dup").count(), 2);

        // the earlier one completes on its own
        let fired = s.tick(t0() + Duration::seconds(60));
        assert!(fired.contains(&ScheduledAction::RemoveCompleted { update: first }));
        assert_eq!(s.len(), 1);

        assert_eq!(s.cancel_update("dup"), 1);
        assert!(s.is_empty());
        assert_eq!(s.pending_actions(), 0);
    }

    #[test]
    fn ties_across_updates_keep_action_priority() {
        let mut s = UpdateScheduler::new();
        let a = s.register_update(request("a", 30, false, true, false), t0());
        s.register_update(request("b", 30, false, false, true), t0());

        let fired = s.tick(t0() + Duration::seconds(30));
        assert_eq!(fired[0], ScheduledAction::RefreshNews);
        assert_eq!(fired[1], ScheduledAction::RefreshCovid);
        assert_eq!(fired[2], ScheduledAction::RemoveCompleted { update: a });
    }
}
