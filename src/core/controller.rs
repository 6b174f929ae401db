//! The generic data controller
//!
//! One controller per inventory kind, composed from four injected parts: a
//! [`Provider`] (fallible OS enumeration), an [`Executor`] (OS mutation), an
//! optional selection predicate (the driver inventory is the service
//! provider narrowed to driver-type entries), and the shared exporter
//! registry. The [`Inventory`] trait is the uniform, object-safe surface
//! both front-ends consume.
//!
//! Single logical owner: every container is owned by the one event loop
//! that refreshes it and iterates it for presentation, so `Rc` suffices for
//! the shared registry.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use crate::export::{ExportBatch, ExportError, ExporterRegistry};

use super::action::{Action, ActionOutcome, Verb, EXPORT_ACTIONS};
use super::container::EntityContainer;
use super::entity::{ManagedEntity, VisualState};
use super::error::{ActionError, RefreshError};

/// The inventory kinds the tool presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Service,
    Driver,
    Process,
    Module,
    Connection,
    ScheduledTask,
    InstalledProgram,
    EnvironmentVariable,
    Window,
}

impl EntityKind {
    /// Stable lowercase name used by the console front-end.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Service => "services",
            EntityKind::Driver => "drivers",
            EntityKind::Process => "processes",
            EntityKind::Module => "modules",
            EntityKind::Connection => "connections",
            EntityKind::ScheduledTask => "tasks",
            EntityKind::InstalledProgram => "programs",
            EntityKind::EnvironmentVariable => "env",
            EntityKind::Window => "windows",
        }
    }
}

/// How a refresh reconciles the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Reconcile membership: add, remove, update.
    Full,
    /// Update existing entries' fields only; membership and order are
    /// untouched so an interactive selection is not disturbed.
    Auto,
}

/// Fallible source of fresh entity snapshots for one kind.
///
/// A snapshot call enumerates the OS subsystem. Per-entity failures (e.g.
/// access denied to one process's details) degrade the individual record;
/// only whole-subsystem failure is an `Err`.
pub trait Provider<E> {
    fn snapshot(&mut self) -> Result<Vec<E>, RefreshError>;
}

/// Performs the OS mutation behind a non-export verb.
///
/// Execution returns once the request is accepted by the OS, not once the
/// target reaches its final state; callers observe the outcome through the
/// next refresh.
pub trait Executor<E> {
    fn run(&mut self, verb: Verb, target: &E) -> Result<ActionOutcome, ActionError>;
}

/// Object-safe inventory surface shared by the interactive and console
/// front-ends.
pub trait Inventory {
    fn kind(&self) -> EntityKind;
    fn title(&self) -> &'static str;

    /// Pulls a fresh enumeration and reconciles the container.
    fn refresh(&mut self, mode: RefreshMode) -> Result<(), RefreshError>;

    fn len(&self) -> usize;
    fn columns(&self) -> &'static [&'static str];
    fn row(&self, index: usize) -> Option<Vec<String>>;
    fn visual_state(&self, index: usize) -> VisualState;

    /// Stable identity string for the entity at `index`.
    fn entity_id(&self, index: usize) -> Option<String>;
    fn entity_label(&self, index: usize) -> Option<String>;

    /// Resolves a console-supplied identity string to a position.
    fn index_of_id(&self, id: &str) -> Option<usize>;

    /// State-dependent action set for one entity, common export actions
    /// appended at the end.
    fn actions(&self, index: usize) -> Vec<Action>;

    /// The complete, state-independent catalog for this kind (enumeration
    /// only; execution through these descriptors still validates
    /// eligibility against the live snapshot).
    fn all_actions(&self) -> Vec<Action>;

    /// Validates and executes a verb. `index` is `None` for zero-target
    /// invocations (whole-inventory export); `out` is the destination for
    /// file-export verbs.
    fn execute(
        &mut self,
        verb: Verb,
        index: Option<usize>,
        out: Option<&Path>,
    ) -> Result<ActionOutcome, ActionError>;
}

/// Generic controller implementing [`Inventory`] for one entity type.
pub struct DataController<E: ManagedEntity> {
    kind: EntityKind,
    title: &'static str,
    container: EntityContainer<E>,
    provider: Box<dyn Provider<E>>,
    executor: Box<dyn Executor<E>>,
    filter: Option<Box<dyn Fn(&E) -> bool>>,
    exporters: Rc<ExporterRegistry>,
}

impl<E: ManagedEntity> DataController<E> {
    pub fn new(
        kind: EntityKind,
        title: &'static str,
        provider: Box<dyn Provider<E>>,
        executor: Box<dyn Executor<E>>,
        exporters: Rc<ExporterRegistry>,
    ) -> Self {
        Self {
            kind,
            title,
            container: EntityContainer::new(),
            provider,
            executor,
            filter: None,
            exporters,
        }
    }

    /// Narrows the enumeration to entities matching `predicate`. The
    /// eligibility machinery is unchanged; only membership is filtered.
    pub fn with_filter(mut self, predicate: impl Fn(&E) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Display name of a verb, resolved through the catalogs.
    fn action_name(verb: Verb) -> &'static str {
        EXPORT_ACTIONS
            .iter()
            .chain(E::catalog().iter())
            .find(|a| a.verb == verb)
            .map(|a| a.name)
            .unwrap_or("action")
    }

    /// Runs the common export path: render the selected entities (or the
    /// whole container) and either write the file or hand the payload back
    /// for the clipboard.
    fn run_export(
        &self,
        verb: Verb,
        format: &'static str,
        index: Option<usize>,
        out: Option<&Path>,
    ) -> Result<ActionOutcome, ActionError> {
        let selected: Vec<&E> = match index {
            Some(i) => {
                let entity = self
                    .container
                    .get_index(i)
                    .ok_or_else(|| ActionError::TargetVanished {
                        id: format!("row {}", i + 1),
                    })?;
                vec![entity]
            }
            None => self.container.iter().collect(),
        };

        let values = selected
            .iter()
            .map(|e| serde_json::to_value(e))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ExportError::from)?;
        let batch = ExportBatch {
            title: self.title,
            columns: E::columns(),
            rows: selected.iter().map(|e| e.row()).collect(),
            values,
        };

        let exporter = self
            .exporters
            .find(format)
            .ok_or_else(|| ActionError::UnknownFormat(format.to_string()))?;
        let payload = exporter.render(&batch)?;
        let count = batch.rows.len();

        if verb.writes_file() {
            let path = out.ok_or(ActionError::MissingDestination {
                action: Self::action_name(verb),
            })?;
            fs::write(path, payload)?;
            debug!(kind = self.kind.name(), count, path = %path.display(), "exported to file");
            Ok(ActionOutcome::Exported {
                path: path.display().to_string(),
                count,
            })
        } else {
            Ok(ActionOutcome::Clipboard { payload, count })
        }
    }
}

impl<E: ManagedEntity> Inventory for DataController<E> {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn title(&self) -> &'static str {
        self.title
    }

    fn refresh(&mut self, mode: RefreshMode) -> Result<(), RefreshError> {
        let mut fresh = self.provider.snapshot()?;
        if let Some(filter) = &self.filter {
            fresh.retain(|e| filter(e));
        }
        debug!(kind = self.kind.name(), count = fresh.len(), ?mode, "refresh");
        match mode {
            RefreshMode::Full => self.container.full_refresh(fresh),
            RefreshMode::Auto => self.container.auto_refresh(fresh),
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.container.len()
    }

    fn columns(&self) -> &'static [&'static str] {
        E::columns()
    }

    fn row(&self, index: usize) -> Option<Vec<String>> {
        self.container.get_index(index).map(|e| e.row())
    }

    fn visual_state(&self, index: usize) -> VisualState {
        self.container
            .get_index(index)
            .map(|e| e.visual_state())
            .unwrap_or(VisualState::Unavailable)
    }

    fn entity_id(&self, index: usize) -> Option<String> {
        self.container.get_index(index).map(|e| e.id())
    }

    fn entity_label(&self, index: usize) -> Option<String> {
        self.container.get_index(index).map(|e| e.label())
    }

    fn index_of_id(&self, id: &str) -> Option<usize> {
        (0..self.container.len()).find(|&i| {
            self.container
                .get_index(i)
                .map(|e| e.id() == id)
                .unwrap_or(false)
        })
    }

    fn actions(&self, index: usize) -> Vec<Action> {
        let mut actions = self
            .container
            .get_index(index)
            .map(|e| e.eligible_actions())
            .unwrap_or_default();
        actions.extend(EXPORT_ACTIONS);
        actions
    }

    fn all_actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = E::catalog().to_vec();
        actions.extend(EXPORT_ACTIONS);
        actions
    }

    fn execute(
        &mut self,
        verb: Verb,
        index: Option<usize>,
        out: Option<&Path>,
    ) -> Result<ActionOutcome, ActionError> {
        if let Some(format) = verb.export_format() {
            return self.run_export(verb, format, index, out);
        }

        let name = Self::action_name(verb);
        let index = index.ok_or(ActionError::MissingTarget { action: name })?;
        let entity = self
            .container
            .get_index(index)
            .cloned()
            .ok_or_else(|| ActionError::TargetVanished {
                id: format!("row {}", index + 1),
            })?;

        // Eligibility is validated against the current snapshot even when
        // the caller picked the verb from the unconditional catalog.
        if !entity.eligible_actions().iter().any(|a| a.verb == verb) {
            return Err(ActionError::NotApplicable {
                action: name,
                target: entity.label(),
            });
        }

        debug!(kind = self.kind.name(), action = name, target = %entity.id(), "execute");
        self.executor.run(verb, &entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Action;
    use serde::Serialize;
    use std::cell::RefCell;

    // A two-state test entity: a stopped gadget can be started, a started
    // one can be stopped. Mirrors the service machine in miniature.
    #[derive(Debug, Clone, Serialize)]
    struct Gadget {
        id: u32,
        running: bool,
    }

    const START: Action = Action::new(Verb::StartService, "Start", "Start the gadget");
    const STOP: Action = Action::new(Verb::StopService, "Stop", "Stop the gadget");
    const CATALOG: [Action; 2] = [START, STOP];

    impl ManagedEntity for Gadget {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn id(&self) -> String {
            self.id.to_string()
        }

        fn label(&self) -> String {
            format!("gadget-{}", self.id)
        }

        fn columns() -> &'static [&'static str] {
            &["Id", "Running"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.id.to_string(), self.running.to_string()]
        }

        fn visual_state(&self) -> VisualState {
            if self.running {
                VisualState::Active
            } else {
                VisualState::Inactive
            }
        }

        fn eligible_actions(&self) -> Vec<Action> {
            if self.running {
                vec![STOP]
            } else {
                vec![START]
            }
        }

        fn catalog() -> &'static [Action] {
            &CATALOG
        }
    }

    struct FixedProvider(Vec<Gadget>);

    impl Provider<Gadget> for FixedProvider {
        fn snapshot(&mut self) -> Result<Vec<Gadget>, RefreshError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Rc<RefCell<Vec<(Verb, u32)>>>,
    }

    impl Executor<Gadget> for RecordingExecutor {
        fn run(&mut self, verb: Verb, target: &Gadget) -> Result<ActionOutcome, ActionError> {
            self.calls.borrow_mut().push((verb, target.id));
            Ok(ActionOutcome::Requested(format!(
                "requested on {}",
                target.label()
            )))
        }
    }

    fn controller(
        gadgets: Vec<Gadget>,
    ) -> (DataController<Gadget>, Rc<RefCell<Vec<(Verb, u32)>>>) {
        let executor = RecordingExecutor::default();
        let calls = executor.calls.clone();
        let mut ctrl = DataController::new(
            EntityKind::Service,
            "Gadgets",
            Box::new(FixedProvider(gadgets)),
            Box::new(executor),
            Rc::new(ExporterRegistry::with_defaults()),
        );
        ctrl.refresh(RefreshMode::Full).unwrap();
        (ctrl, calls)
    }

    fn gadget(id: u32, running: bool) -> Gadget {
        Gadget { id, running }
    }

    #[test]
    fn per_entity_actions_are_a_subset_of_the_catalog() {
        let (ctrl, _) = controller(vec![gadget(1, false), gadget(2, true)]);
        let all = ctrl.all_actions();
        for index in 0..ctrl.len() {
            for action in ctrl.actions(index) {
                assert!(all.contains(&action), "{:?} missing from catalog", action);
            }
        }
    }

    #[test]
    fn export_actions_are_appended_for_every_entity() {
        let (ctrl, _) = controller(vec![gadget(1, false)]);
        let actions = ctrl.actions(0);
        let tail: Vec<Verb> = actions.iter().rev().take(4).map(|a| a.verb).collect();
        assert!(tail.contains(&Verb::CopyJson));
        assert!(tail.contains(&Verb::ExportTextFile));
    }

    #[test]
    fn eligible_action_reaches_the_executor() {
        let (mut ctrl, calls) = controller(vec![gadget(7, false)]);
        let outcome = ctrl.execute(Verb::StartService, Some(0), None).unwrap();
        assert!(matches!(outcome, ActionOutcome::Requested(_)));
        assert_eq!(calls.borrow().as_slice(), &[(Verb::StartService, 7)]);
    }

    #[test]
    fn ineligible_catalog_action_fails_without_touching_the_executor() {
        let (mut ctrl, calls) = controller(vec![gadget(7, false)]);
        // Stop is in the catalog but the gadget is not running.
        let err = ctrl.execute(Verb::StopService, Some(0), None).unwrap_err();
        assert!(matches!(err, ActionError::NotApplicable { .. }));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn foreign_verb_is_not_applicable() {
        let (mut ctrl, calls) = controller(vec![gadget(1, true)]);
        let err = ctrl
            .execute(Verb::CloseConnection, Some(0), None)
            .unwrap_err();
        assert!(matches!(err, ActionError::NotApplicable { .. }));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn missing_target_and_vanished_target_are_distinct() {
        let (mut ctrl, _) = controller(vec![gadget(1, false)]);
        let missing = ctrl.execute(Verb::StartService, None, None).unwrap_err();
        assert!(matches!(missing, ActionError::MissingTarget { .. }));

        let vanished = ctrl.execute(Verb::StartService, Some(9), None).unwrap_err();
        assert!(matches!(vanished, ActionError::TargetVanished { .. }));
    }

    #[test]
    fn copy_json_renders_every_record() {
        let (mut ctrl, _) = controller(vec![gadget(1, false), gadget(2, true)]);
        let outcome = ctrl.execute(Verb::CopyJson, None, None).unwrap();
        match outcome {
            ActionOutcome::Clipboard { payload, count } => {
                assert_eq!(count, 2);
                let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
                assert_eq!(parsed.as_array().unwrap().len(), 2);
                assert_eq!(parsed[1]["running"], true);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn file_export_without_a_path_is_rejected() {
        let (mut ctrl, _) = controller(vec![gadget(1, false)]);
        let err = ctrl.execute(Verb::ExportJsonFile, None, None).unwrap_err();
        assert!(matches!(err, ActionError::MissingDestination { .. }));
    }

    #[test]
    fn filter_narrows_membership_without_changing_eligibility() {
        let executor = RecordingExecutor::default();
        let mut ctrl = DataController::new(
            EntityKind::Driver,
            "Running gadgets",
            Box::new(FixedProvider(vec![
                gadget(1, false),
                gadget(2, true),
                gadget(3, true),
            ])),
            Box::new(executor),
            Rc::new(ExporterRegistry::with_defaults()),
        )
        .with_filter(|g: &Gadget| g.running);
        ctrl.refresh(RefreshMode::Full).unwrap();

        assert_eq!(ctrl.len(), 2);
        assert_eq!(ctrl.entity_id(0).as_deref(), Some("2"));
        // Filtered view still offers the state-dependent set.
        assert!(ctrl.actions(0).iter().any(|a| a.verb == Verb::StopService));
    }

    #[test]
    fn index_of_id_resolves_console_targets() {
        let (ctrl, _) = controller(vec![gadget(5, false), gadget(9, true)]);
        assert_eq!(ctrl.index_of_id("9"), Some(1));
        assert_eq!(ctrl.index_of_id("404"), None);
    }
}
