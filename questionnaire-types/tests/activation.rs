//! Activation and dependency cascade tests

use std::sync::{Arc, Mutex};

use questionnaire_bus::{EventBus, Handler, HandlerError, Interests, Subscriber};
use questionnaire_types::{
    MaxLength, Prompt, PromptActivated, PromptDeactivated, PromptEvent, PromptId, PromptKind,
    Questionnaire, Required, WiringError,
};

/// Records the ids of prompts seen in activation events.
#[derive(Default)]
struct Tracker {
    activated: Mutex<Vec<PromptId>>,
    deactivated: Mutex<Vec<PromptId>>,
}

impl Tracker {
    fn activated(&self) -> Vec<PromptId> {
        self.activated.lock().unwrap().clone()
    }

    fn deactivated(&self) -> Vec<PromptId> {
        self.deactivated.lock().unwrap().clone()
    }
}

impl Handler<PromptActivated> for Tracker {
    fn on_event(&self, event: &PromptActivated) -> Result<(), HandlerError> {
        self.activated.lock().unwrap().push(event.prompt().id());
        Ok(())
    }
}

impl Handler<PromptDeactivated> for Tracker {
    fn on_event(&self, event: &PromptDeactivated) -> Result<(), HandlerError> {
        self.deactivated.lock().unwrap().push(event.prompt().id());
        Ok(())
    }
}

impl Subscriber for Tracker {
    fn interests(interests: &mut Interests<Self>) {
        interests.on::<PromptActivated>().on::<PromptDeactivated>();
    }
}

struct Fixture {
    questionnaire: Questionnaire,
    tracker: Arc<Tracker>,
    a: Arc<Prompt>,
    b: Arc<Prompt>,
    c: Arc<Prompt>,
}

fn fixture() -> Fixture {
    let a = Prompt::boolean("A");
    let b = Prompt::question(1, "B", vec![]);
    let c = Prompt::question(2, "C", vec![]);
    let bus = Arc::new(EventBus::new());
    let tracker = Arc::new(Tracker::default());
    bus.subscribe(&tracker);
    let questionnaire = Questionnaire::new(
        "Fixture",
        vec![Arc::clone(&a), Arc::clone(&b), Arc::clone(&c)],
        bus,
    )
    .unwrap();
    Fixture {
        questionnaire,
        tracker,
        a,
        b,
        c,
    }
}

#[test]
fn test_prompts_start_active() {
    let f = fixture();
    assert!(f.a.is_active());

    let inactive = Prompt::builder("later", PromptKind::Note).inactive().build();
    assert!(!inactive.is_active());
}

#[test]
fn test_setting_same_state_publishes_nothing() {
    let f = fixture();

    assert!(!f.a.set_active(true));

    assert!(f.tracker.activated().is_empty());
    assert!(f.tracker.deactivated().is_empty());
}

#[test]
fn test_each_change_publishes_once() {
    let f = fixture();

    assert!(f.a.set_active(false));
    assert!(!f.a.set_active(false));
    assert!(f.a.set_active(true));

    assert_eq!(f.tracker.deactivated(), vec![f.a.id()]);
    assert_eq!(f.tracker.activated(), vec![f.a.id()]);
}

#[test]
fn test_deactivation_cascades_one_hop() {
    let f = fixture();
    f.questionnaire.watch_deactivation(&f.a, &f.b).unwrap();

    f.a.set_active(false);

    assert!(!f.b.is_active());
    assert!(f.c.is_active());
    assert_eq!(f.tracker.deactivated(), vec![f.a.id(), f.b.id()]);
}

#[test]
fn test_deactivation_cascades_transitively() {
    let f = fixture();
    f.questionnaire.watch_deactivation(&f.a, &f.b).unwrap();
    f.questionnaire.watch_deactivation(&f.b, &f.c).unwrap();

    f.a.set_active(false);

    assert!(!f.b.is_active());
    assert!(!f.c.is_active());
    assert_eq!(f.tracker.deactivated(), vec![f.a.id(), f.b.id(), f.c.id()]);
}

#[test]
fn test_reactivation_does_not_cascade() {
    let f = fixture();
    f.questionnaire.watch_deactivation(&f.a, &f.b).unwrap();
    f.a.set_active(false);

    f.a.set_active(true);

    assert!(f.a.is_active());
    assert!(!f.b.is_active());
    assert_eq!(f.tracker.activated(), vec![f.a.id()]);
}

#[test]
fn test_unrelated_deactivation_is_ignored() {
    let f = fixture();
    f.questionnaire.watch_deactivation(&f.a, &f.b).unwrap();

    f.c.set_active(false);

    assert!(f.b.is_active());
}

#[test]
fn test_already_inactive_dependent_is_not_republished() {
    let f = fixture();
    f.questionnaire.watch_deactivation(&f.a, &f.b).unwrap();
    f.b.set_active(false);

    f.a.set_active(false);

    assert_eq!(f.tracker.deactivated(), vec![f.b.id(), f.a.id()]);
}

#[test]
fn test_watching_twice_subscribes_once() {
    let f = fixture();
    let before = f.questionnaire.bus().subscriber_count::<PromptDeactivated>();

    f.questionnaire.watch_deactivation(&f.a, &f.c).unwrap();
    f.questionnaire.watch_deactivation(&f.b, &f.c).unwrap();
    f.questionnaire.watch_deactivation(&f.a, &f.c).unwrap();

    assert_eq!(
        f.questionnaire.bus().subscriber_count::<PromptDeactivated>(),
        before + 1
    );
    assert_eq!(
        f.c.dependencies::<PromptDeactivated>(),
        vec![f.a.id(), f.b.id()]
    );

    f.b.set_active(false);
    assert!(!f.c.is_active());
    assert_eq!(f.tracker.deactivated(), vec![f.b.id(), f.c.id()]);
}

#[test]
fn test_dependency_without_subscription_does_not_cascade() {
    let f = fixture();
    f.b.add_dependency::<PromptDeactivated>(&f.a);
    assert!(f.b.depends_on::<PromptDeactivated>(f.a.id()));

    f.a.set_active(false);

    assert!(f.b.is_active());
}

#[test]
fn test_manual_wiring_cascades() {
    let f = fixture();
    f.b.add_dependency::<PromptDeactivated>(&f.a);
    f.questionnaire.bus().subscribe(&f.b);

    f.a.set_active(false);

    assert!(!f.b.is_active());
}

#[test]
fn test_dependencies_are_per_event_type() {
    let f = fixture();
    f.b.add_dependency::<PromptActivated>(&f.a);

    assert!(f.b.depends_on::<PromptActivated>(f.a.id()));
    assert!(!f.b.depends_on::<PromptDeactivated>(f.a.id()));
    assert!(f.b.dependencies::<PromptDeactivated>().is_empty());
}

#[test]
fn test_self_dependency_is_rejected() {
    let f = fixture();

    let err = f.questionnaire.watch_deactivation(&f.a, &f.a).unwrap_err();

    assert_eq!(err, WiringError::SelfDependency(f.a.id()));
    assert_eq!(err.prompt(), f.a.id());
}

#[test]
fn test_unattached_prompt_cannot_be_watched() {
    let f = fixture();
    let stray = Prompt::boolean("stray");

    assert_eq!(
        f.questionnaire.watch_deactivation(&stray, &f.b),
        Err(WiringError::NotAttached(stray.id()))
    );
    assert_eq!(
        f.questionnaire.watch_deactivation(&f.a, &stray),
        Err(WiringError::NotAttached(stray.id()))
    );
}

#[test]
fn test_prompts_of_different_buses_cannot_be_wired() {
    let f = fixture();
    let other = fixture();

    assert_eq!(
        f.questionnaire.watch_deactivation(&other.a, &f.b),
        Err(WiringError::ForeignBus(other.a.id()))
    );
    assert_eq!(
        f.questionnaire.watch_deactivation(&f.a, &other.b),
        Err(WiringError::ForeignBus(other.b.id()))
    );
}

#[test]
fn test_prompt_cannot_join_second_bus() {
    let f = fixture();

    let result = Questionnaire::new("Second", vec![Arc::clone(&f.a)], Arc::new(EventBus::new()));

    assert_eq!(result.unwrap_err(), WiringError::ForeignBus(f.a.id()));
}

#[test]
fn test_rejected_questionnaire_leaves_prompts_unattached() {
    let f = fixture();
    let fresh = Prompt::boolean("fresh");
    let rejected_bus = Arc::new(EventBus::new());

    let result = Questionnaire::new(
        "Second",
        vec![Arc::clone(&fresh), Arc::clone(&f.a)],
        Arc::clone(&rejected_bus),
    );

    assert_eq!(result.unwrap_err(), WiringError::ForeignBus(f.a.id()));
    assert!(!fresh.is_attached_to(&rejected_bus));
    assert!(fresh.bus().is_none());

    drop(rejected_bus);
    let retry =
        Questionnaire::new("Retry", vec![Arc::clone(&fresh)], Arc::new(EventBus::new())).unwrap();
    assert!(fresh.is_attached_to(retry.bus()));
}

#[test]
fn test_prompts_rejoin_after_bus_is_dropped() {
    let a = Prompt::boolean("A");
    let b = Prompt::question(1, "B", vec![]);
    let first =
        Questionnaire::new("First", vec![Arc::clone(&a), Arc::clone(&b)], Arc::new(EventBus::new()))
            .unwrap();
    first.watch_deactivation(&a, &b).unwrap();

    drop(first);
    assert!(a.bus().is_none());
    assert!(b.bus().is_none());

    let bus = Arc::new(EventBus::new());
    let tracker = Arc::new(Tracker::default());
    bus.subscribe(&tracker);
    let second =
        Questionnaire::new("Second", vec![Arc::clone(&a), Arc::clone(&b)], Arc::clone(&bus))
            .unwrap();
    assert!(b.dependencies::<PromptDeactivated>().is_empty());

    second.watch_deactivation(&a, &b).unwrap();
    assert_eq!(bus.subscriber_count::<PromptDeactivated>(), 2);

    a.set_active(false);

    assert!(!b.is_active());
    assert_eq!(tracker.deactivated(), vec![a.id(), b.id()]);
}

#[test]
fn test_long_dependency_chain_cascades_to_the_end() {
    const LENGTH: u32 = 2_000;
    let prompts: Vec<Arc<Prompt>> = (1..=LENGTH)
        .map(|number| Prompt::question(number, format!("Q{number}"), vec![]))
        .collect();
    let questionnaire =
        Questionnaire::new("Chain", prompts.clone(), Arc::new(EventBus::new())).unwrap();
    for pair in prompts.windows(2) {
        questionnaire.watch_deactivation(&pair[0], &pair[1]).unwrap();
    }

    prompts[0].set_active(false);

    assert!(prompts.iter().all(|prompt| !prompt.is_active()));
}

#[test]
fn test_unattached_prompt_changes_state_silently() {
    let stray = Prompt::boolean("stray");

    assert!(stray.set_active(false));
    assert!(!stray.is_active());
    assert!(stray.bus().is_none());
}

#[test]
fn test_dropped_dependent_is_pruned() {
    let a = Prompt::boolean("A");
    let b = Prompt::question(1, "B", vec![]);
    let bus = Arc::new(EventBus::new());
    let questionnaire =
        Questionnaire::new("Drop", vec![Arc::clone(&a), Arc::clone(&b)], Arc::clone(&bus)).unwrap();
    questionnaire.watch_deactivation(&a, &b).unwrap();
    assert_eq!(bus.subscriber_count::<PromptDeactivated>(), 1);

    drop(questionnaire);
    drop(b);
    a.set_active(false);

    assert_eq!(bus.subscriber_count::<PromptDeactivated>(), 0);
}

#[test]
fn test_walk_is_depth_first() {
    let yes = Prompt::boolean("Yes");
    let no = Prompt::boolean("No");
    let choice = Prompt::single_choice(vec![Arc::clone(&yes), Arc::clone(&no)]);
    let note = Prompt::note("Pick one");
    let question = Prompt::question(1, "Q", vec![Arc::clone(&choice), Arc::clone(&note)]);
    let info = Prompt::info("Help text");
    let help = Prompt::help_link("Help", vec![Arc::clone(&info)]);
    let questionnaire = Questionnaire::new(
        "Walk",
        vec![Arc::clone(&help), Arc::clone(&question)],
        Arc::new(EventBus::new()),
    )
    .unwrap();

    let order: Vec<PromptId> = questionnaire.walk().map(|p| p.id()).collect();

    assert_eq!(
        order,
        vec![help.id(), info.id(), question.id(), choice.id(), yes.id(), no.id(), note.id()]
    );
    assert!(questionnaire.walk().all(|p| p.bus().is_some()));
    assert_eq!(questionnaire.find(no.id()).map(|p| p.text()), Some("No"));
    assert_eq!(questionnaire.len(), 2);
}

#[test]
fn test_boolean_value_round_trip() {
    let answer = Prompt::boolean("Yes");
    assert!(!answer.is_checked());

    answer.set_checked(true);
    assert!(answer.is_checked());
    assert_eq!(answer.value().as_deref(), Some("true"));

    answer.set_checked(false);
    assert_eq!(answer.value().as_deref(), Some("false"));
}

#[test]
fn test_business_rules() {
    let name = Prompt::builder("", PromptKind::Text(questionnaire_types::TextPrompt::new(10)))
        .rule(Required)
        .rule(MaxLength(10))
        .build();
    assert!(!name.is_valid());

    name.set_value("Acme Corp");
    assert!(name.is_valid());

    name.set_value("Acme Corporation Ltd");
    assert!(!name.is_valid());

    let no_digits = Prompt::builder("", PromptKind::Text(questionnaire_types::TextPrompt::new(50)))
        .value("R2D2")
        .rule(|prompt: &Prompt| {
            prompt
                .value()
                .is_some_and(|v| !v.chars().any(|c| c.is_ascii_digit()))
        })
        .build();
    assert!(!no_digits.is_valid());
}

#[test]
fn test_questionnaire_validates_active_prompts_only() {
    let name = Prompt::builder("", PromptKind::Text(questionnaire_types::TextPrompt::new(10)))
        .rule(Required)
        .build();
    let questionnaire = Questionnaire::new(
        "Validation",
        vec![Arc::clone(&name)],
        Arc::new(EventBus::new()),
    )
    .unwrap();
    assert!(!questionnaire.is_valid());

    name.set_active(false);
    assert!(questionnaire.is_valid());
}
