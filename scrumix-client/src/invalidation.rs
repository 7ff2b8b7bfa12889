use crate::api::sprints::SPRINT_BACKLOG;
use crate::deduplication::RequestDeduplicator;
use crate::key::{KeyPattern, Resource};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Every write the client can issue. Each one invalidates a set of reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Mutation {
    MarkNotificationRead,
    MarkAllNotificationsRead,
    DeleteNotification,
    CreateBacklogItem,
    UpdateBacklogItem,
    DeleteBacklogItem,
    CreateSprint,
    UpdateSprint,
    DeleteSprint,
    UpdateProfile,
    DeleteAccount,
}

lazy_static! {
    static ref DEFAULT_POLICY: InvalidationPolicy = InvalidationPolicy::from_rules(default_rules());
}

fn default_rules() -> HashMap<Mutation, Vec<KeyPattern>> {
    use Mutation::*;

    let notifications = KeyPattern::resource(Resource::Notifications);
    let backlogs = KeyPattern::resource(Resource::Backlogs);
    let sprints = KeyPattern::resource(Resource::Sprints);

    HashMap::from([
        (MarkNotificationRead, vec![notifications]),
        (MarkAllNotificationsRead, vec![notifications]),
        (DeleteNotification, vec![notifications]),
        // sprint backlogs embed the items
        (CreateBacklogItem, vec![backlogs, KeyPattern::operation(SPRINT_BACKLOG)]),
        (UpdateBacklogItem, vec![backlogs, KeyPattern::operation(SPRINT_BACKLOG)]),
        (DeleteBacklogItem, vec![backlogs, KeyPattern::operation(SPRINT_BACKLOG)]),
        // items carry their sprint assignment
        (CreateSprint, vec![sprints, backlogs]),
        (UpdateSprint, vec![sprints, backlogs]),
        (DeleteSprint, vec![sprints, backlogs]),
        (UpdateProfile, vec![KeyPattern::resource(Resource::Users)]),
        (DeleteAccount, vec![KeyPattern::all()]),
    ])
}

/// Declarative table of which reads each mutation makes stale
#[derive(Debug, Clone)]
pub struct InvalidationPolicy {
    rules: HashMap<Mutation, Vec<KeyPattern>>,
}

impl Default for InvalidationPolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

impl InvalidationPolicy {
    pub fn from_rules(rules: HashMap<Mutation, Vec<KeyPattern>>) -> Self {
        Self { rules }
    }

    /// Replaces the patterns invalidated by `mutation`
    pub fn with_rule(mut self, mutation: Mutation, patterns: Vec<KeyPattern>) -> Self {
        self.rules.insert(mutation, patterns);
        self
    }

    pub fn patterns(&self, mutation: Mutation) -> &[KeyPattern] {
        self.rules.get(&mutation).map(Vec::as_slice).unwrap_or_default()
    }

    /// Drops every in-flight read `mutation` affects; returns how many
    pub fn apply<T>(&self, mutation: Mutation, deduplicator: &RequestDeduplicator<T>) -> usize
    where
        T: Clone + Send + Sync + 'static,
    {
        let removed = self
            .patterns(mutation)
            .iter()
            .map(|pattern| deduplicator.invalidate(pattern))
            .sum();
        if removed > 0 {
            log::debug!("{} invalidated {} in-flight reads", mutation, removed);
        }
        removed
    }
}
