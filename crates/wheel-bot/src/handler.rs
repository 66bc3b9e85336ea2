//! Command dispatch.
//!
//! `WheelHandler` holds no wheel state between commands. Each command loads
//! the wheel under the store's lock, mutates it, and saves it back before
//! any reply is sent.

use std::sync::{Arc, Mutex, MutexGuard};

use rand::SeedableRng;
use rand::rngs::StdRng;

use wheel_core::{AddReport, Draw, TagReport, WheelError, filter_by_tags, weighted_pick};
use wheel_store::{StoreLocks, StoreWriteError, Transactor, Update, WheelStore};

use crate::command::{self, ArgShape, Command, ResetTarget, SpinArgs, TagArgs, Verb};
use crate::config::WheelConfig;
use crate::error::{ArgError, ParseError, ReplyError};
use crate::help;
use crate::reply::Replier;

/// Text used when there is nothing to list or spin.
const EMPTY_WHEEL: &str = "The wheel is empty! Please add items first.";

/// Routes command text to the option store and draw engine.
pub struct WheelHandler {
    tx: Transactor,
    config: WheelConfig,
    rng: Mutex<StdRng>,
}

/// How a spin ended.
enum SpinOutcome {
    Empty,
    NoMatch(Vec<String>),
    AllZero,
    Drawn { draw: Draw, debug: bool },
}

impl WheelHandler {
    /// Create a handler over a store. Handlers built from the same `locks`
    /// serialize their writes to a shared store.
    pub fn new(store: Arc<dyn WheelStore>, locks: &StoreLocks, config: WheelConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            tx: Transactor::new(store, locks),
            config,
            rng: Mutex::new(rng),
        }
    }

    fn prefix(&self) -> &str {
        &self.config.command_prefix
    }

    /// Handle one command and send its replies.
    ///
    /// Malformed input, missing options, and store failures all end in a
    /// reply. Only a failing replier is reported as an error.
    pub async fn handle(&self, input: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        let text = command::strip_prefix(input, &self.config.command_prefix);
        let cmd = match command::parse(text) {
            Ok(cmd) => cmd,
            Err(ParseError::Empty) => {
                replier.send(&help::summary(self.prefix())).await?;
                return Ok(());
            }
            Err(ParseError::UnknownVerb(token)) => {
                tracing::debug!(token = %token, "unknown command");
                replier
                    .send(&help::unknown_command(Verb::suggest(&token)))
                    .await?;
                return Ok(());
            }
        };
        tracing::debug!(verb = %cmd.verb, args = cmd.args, "handling command");

        if cmd.verb.arg_shape() == ArgShape::Required && cmd.args.is_empty() {
            replier
                .send(&help::missing_argument(cmd.verb, self.prefix()))
                .await?;
            return Ok(());
        }

        self.dispatch(cmd, replier).await
    }

    async fn dispatch(&self, cmd: Command<'_>, replier: &dyn Replier) -> Result<(), ReplyError> {
        match cmd.verb {
            Verb::Add => self.do_add(cmd.args, replier).await,
            Verb::Remove => self.do_remove(cmd.args, replier).await,
            Verb::List => self.do_list(cmd.args, replier).await,
            Verb::Spin => self.do_spin(cmd.args, replier).await,
            Verb::Tag => self.do_tag(cmd.args, replier).await,
            Verb::Reset => self.do_reset(cmd.args, replier).await,
            Verb::Help => self.do_help(cmd.args, replier).await,
        }
    }

    async fn do_add(&self, args: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        let candidates: Vec<&str> = command::split_list(args)
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect();
        if candidates.is_empty() {
            replier
                .send(&help::missing_argument(Verb::Add, self.prefix()))
                .await?;
            return Ok(());
        }

        let result = self
            .tx
            .update(|wheel| {
                let report = wheel.add_all(candidates.iter().copied());
                if report.added.is_empty() {
                    Update::Discard(report)
                } else {
                    Update::Commit(report)
                }
            })
            .await;

        match result {
            Ok(report) => {
                if !report.added.is_empty() {
                    tracing::info!(added = ?report.added, "options added");
                }
                replier.send(&add_reply(&report)).await?;
            }
            Err(e) => {
                replier.send(&save_failed(&e)).await?;
            }
        }
        Ok(())
    }

    async fn do_remove(&self, name: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        let result = self
            .tx
            .update(|wheel| match wheel.remove(name) {
                Some(_) => Update::Commit(true),
                None => Update::Discard(false),
            })
            .await;

        let reply = match result {
            Ok(true) => {
                tracing::info!(item = name, "option removed");
                format!("Removed '{name}' from the wheel!")
            }
            Ok(false) => format!("'{name}' is not in the wheel."),
            Err(e) => save_failed(&e),
        };
        replier.send(&reply).await?;
        Ok(())
    }

    async fn do_list(&self, tag: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        let wheel = self.tx.read().await;

        let reply = if tag.is_empty() {
            if wheel.is_empty() {
                EMPTY_WHEEL.to_string()
            } else {
                let mut out = String::from("Current items on the wheel:");
                for option in wheel.options() {
                    out.push_str(&format!("\n\t{option}"));
                }
                out
            }
        } else {
            let tagged = wheel.tagged(tag);
            if tagged.is_empty() {
                format!("No options found with the tag '{tag}'.")
            } else {
                let mut out = format!("Items on the wheel tagged '{tag}':");
                for option in tagged {
                    out.push_str(&format!("\n\t{option}"));
                }
                out
            }
        };
        replier.send(&reply).await?;
        Ok(())
    }

    async fn do_spin(&self, args: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        let args = SpinArgs::parse(args);

        let result = self
            .tx
            .update(|wheel| {
                if wheel.is_empty() {
                    return Update::Discard(SpinOutcome::Empty);
                }
                let pool = if args.tags.is_empty() {
                    wheel.options().to_vec()
                } else {
                    filter_by_tags(wheel.options(), &args.tags)
                };
                if pool.is_empty() {
                    return Update::Discard(SpinOutcome::NoMatch(args.tags.clone()));
                }
                let Some(draw) = weighted_pick(&pool, &mut self.rng()) else {
                    return Update::Discard(SpinOutcome::AllZero);
                };
                if args.debug {
                    Update::Discard(SpinOutcome::Drawn { draw, debug: true })
                } else {
                    wheel.rebalance(draw.name());
                    Update::Commit(SpinOutcome::Drawn { draw, debug: false })
                }
            })
            .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                replier.send(&save_failed(&e)).await?;
                return Ok(());
            }
        };

        match outcome {
            SpinOutcome::Empty => {
                replier.send(EMPTY_WHEEL).await?;
            }
            SpinOutcome::NoMatch(tags) => {
                replier
                    .send(&format!(
                        "No options found with the given tags: {}",
                        tags.join(", ")
                    ))
                    .await?;
            }
            SpinOutcome::AllZero => {
                replier
                    .send(&format!(
                        "Every candidate has weight 0. Use `{} reset weights` to spin again.",
                        self.prefix()
                    ))
                    .await?;
            }
            SpinOutcome::Drawn { draw, debug: is_debug } => {
                tracing::info!(
                    picked = draw.name(),
                    roll = draw.roll,
                    total = draw.total_weight,
                    debug = is_debug,
                    "wheel spun"
                );
                let message = replier.send(&self.config.spin_banner).await?;
                replier.edit(&message, &spin_reply(&draw, is_debug)).await?;
                replier.pin(&message).await?;
            }
        }
        Ok(())
    }

    async fn do_tag(&self, args: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        let args = match TagArgs::parse(args) {
            Ok(args) => args,
            Err(ArgError::Usage) => {
                replier.send(&help::usage(Verb::Tag, self.prefix())).await?;
                return Ok(());
            }
            Err(ArgError::EmptyTag) => {
                replier.send("Tags cannot be empty.").await?;
                return Ok(());
            }
        };

        let result = self
            .tx
            .update(|wheel| match wheel.tag(args.item, &args.tags) {
                Ok(report) if report.added.is_empty() => Update::Discard(Ok(report)),
                Ok(report) => Update::Commit(Ok(report)),
                Err(e) => Update::Discard(Err(e)),
            })
            .await;

        let reply = match result {
            Ok(Ok(report)) => {
                if !report.added.is_empty() {
                    tracing::info!(item = args.item, tags = ?report.added, "option tagged");
                }
                tag_reply(args.item, &report)
            }
            Ok(Err(WheelError::NotFound(name))) => format!("'{name}' not found in the wheel."),
            Ok(Err(WheelError::Validation(msg))) => format!("Invalid tags: {msg}."),
            Err(e) => save_failed(&e),
        };
        replier.send(&reply).await?;
        Ok(())
    }

    async fn do_reset(&self, args: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        let target = match ResetTarget::parse(args) {
            Some(ResetTarget::Help) | None => {
                replier.send(&help::usage(Verb::Reset, self.prefix())).await?;
                return Ok(());
            }
            Some(target) => target,
        };

        let result = self
            .tx
            .update(|wheel| {
                match target {
                    ResetTarget::Options => wheel.clear(),
                    ResetTarget::Weights => wheel.reset_weights(),
                    ResetTarget::Tags => wheel.clear_tags(),
                    ResetTarget::Help => {}
                }
                Update::Commit(())
            })
            .await;

        if result.is_ok() {
            tracing::info!(?target, "wheel reset");
        }
        let reply = match (result, target) {
            (Err(e), _) => save_failed(&e),
            (Ok(()), ResetTarget::Options) => "Removed every item from the wheel.".to_string(),
            (Ok(()), ResetTarget::Weights) => "Reset every weight to 1.".to_string(),
            (Ok(()), ResetTarget::Tags) => "Removed every tag from the wheel.".to_string(),
            (Ok(()), ResetTarget::Help) => help::usage(Verb::Reset, self.prefix()),
        };
        replier.send(&reply).await?;
        Ok(())
    }

    async fn do_help(&self, topic: &str, replier: &dyn Replier) -> Result<(), ReplyError> {
        if topic.is_empty() {
            replier.send(&help::summary(self.prefix())).await?;
            return Ok(());
        }
        let verbs = help::matching_topics(topic);
        if verbs.is_empty() {
            replier
                .send(&format!(
                    "No help for '{topic}'.\n{}",
                    help::summary(self.prefix())
                ))
                .await?;
            return Ok(());
        }
        for verb in verbs {
            replier.send(&help::usage(verb, self.prefix())).await?;
        }
        Ok(())
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn add_reply(report: &AddReport) -> String {
    let mut out = match report.added.as_slice() {
        [] if report.existing.len() == 1 => {
            return format!("'{}' is already in the wheel.", report.existing[0]);
        }
        [] => return "All the items are already in the wheel.".to_string(),
        [one] => format!("Adding '{one}' to the wheel!"),
        many => format!(
            "Adding the following items to the wheel: {}",
            many.join(", ")
        ),
    };
    if !report.existing.is_empty() {
        out.push_str(&format!(
            "\nAlready in the wheel: {}",
            report.existing.join(", ")
        ));
    }
    out
}

fn tag_reply(item: &str, report: &TagReport) -> String {
    let mut lines = Vec::new();
    if !report.added.is_empty() {
        lines.push(format!("Tagged '{item}' with: {}", report.added.join(", ")));
    }
    if !report.existing.is_empty() {
        lines.push(format!(
            "'{item}' is already tagged with: {}",
            report.existing.join(", ")
        ));
    }
    lines.join("\n")
}

fn spin_reply(draw: &Draw, debug: bool) -> String {
    let mut out = format!("The Wheel has Spoken! The result is {}", draw.name());
    if debug {
        out.push_str(&format!(
            "\n(debug: {} of {} tickets, {:.1}%, from {} candidates; weights unchanged)",
            draw.option.weight,
            draw.total_weight,
            draw.odds_percent(),
            draw.candidates
        ));
    }
    out
}

fn save_failed(err: &StoreWriteError) -> String {
    format!("Could not save the wheel, nothing was changed: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::Transcript;
    use wheel_core::{Wheel, WheelOption};
    use wheel_store::MemoryStore;

    fn handler_with(wheel: Option<&Wheel>) -> (WheelHandler, Arc<MemoryStore>) {
        let store = Arc::new(match wheel {
            Some(w) => MemoryStore::with_wheel("test", w),
            None => MemoryStore::new("test"),
        });
        let handler = WheelHandler::new(
            store.clone(),
            &StoreLocks::new(),
            WheelConfig::default().with_seed(42),
        );
        (handler, store)
    }

    async fn run(handler: &WheelHandler, input: &str) -> Vec<String> {
        let transcript = Transcript::new();
        handler.handle(input, &transcript).await.unwrap();
        transcript.messages()
    }

    async fn stored(store: &MemoryStore) -> Wheel {
        store.load().await.unwrap_or_default()
    }

    #[tokio::test]
    async fn add_single_item() {
        let (h, store) = handler_with(None);
        assert_eq!(run(&h, "add pizza").await, vec!["Adding 'pizza' to the wheel!"]);
        let wheel = stored(&store).await;
        assert_eq!(wheel.get("pizza"), Some(&WheelOption::new("pizza")));
    }

    #[tokio::test]
    async fn add_with_prefix() {
        let (h, store) = handler_with(None);
        run(&h, "$wheel add pizza").await;
        assert!(stored(&store).await.contains("pizza"));
    }

    #[tokio::test]
    async fn add_batch_collapses_duplicates() {
        let (h, store) = handler_with(None);
        let replies = run(&h, "add a, b, a").await;
        assert_eq!(
            replies,
            vec!["Adding the following items to the wheel: a, b"]
        );
        let wheel = stored(&store).await;
        let names: Vec<_> = wheel.options().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(wheel.options().iter().all(|o| o.weight == 1));
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn add_existing_is_noop() {
        let wheel = Wheel::from_options(vec![WheelOption::new("pizza").with_weight(4)]);
        let (h, store) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "add pizza").await,
            vec!["'pizza' is already in the wheel."]
        );
        assert_eq!(
            run(&h, "add pizza, pizza").await,
            vec!["'pizza' is already in the wheel."]
        );
        assert_eq!(store.save_count(), 0);
        assert_eq!(stored(&store).await, wheel);
    }

    #[tokio::test]
    async fn add_all_existing_batch() {
        let wheel = Wheel::from_options(vec![WheelOption::new("a"), WheelOption::new("b")]);
        let (h, _) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "add a,b").await,
            vec!["All the items are already in the wheel."]
        );
    }

    #[tokio::test]
    async fn add_partial_reports_both() {
        let wheel = Wheel::from_options(vec![WheelOption::new("a")]);
        let (h, _) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "add a, c").await,
            vec!["Adding 'c' to the wheel!\nAlready in the wheel: a"]
        );
    }

    #[tokio::test]
    async fn add_without_item() {
        let (h, store) = handler_with(None);
        for input in ["add", "add   ", "add , ,"] {
            assert_eq!(
                run(&h, input).await,
                vec!["Please specify a new item to add."]
            );
        }
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn remove_existing() {
        let wheel = Wheel::from_options(vec![WheelOption::new("a"), WheelOption::new("b")]);
        let (h, store) = handler_with(Some(&wheel));
        assert_eq!(run(&h, "remove a").await, vec!["Removed 'a' from the wheel!"]);
        assert!(!stored(&store).await.contains("a"));
    }

    #[tokio::test]
    async fn remove_missing() {
        let wheel = Wheel::from_options(vec![WheelOption::new("a")]);
        let (h, store) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "remove ghost").await,
            vec!["'ghost' is not in the wheel."]
        );
        assert_eq!(store.save_count(), 0);
        assert_eq!(stored(&store).await, wheel);
    }

    #[tokio::test]
    async fn remove_without_item() {
        let (h, _) = handler_with(None);
        assert_eq!(
            run(&h, "remove").await,
            vec!["Please specify an item to remove."]
        );
    }

    #[tokio::test]
    async fn list_empty() {
        let (h, _) = handler_with(None);
        assert_eq!(run(&h, "list").await, vec![EMPTY_WHEEL]);
    }

    #[tokio::test]
    async fn list_all() {
        let wheel = Wheel::from_options(vec![
            WheelOption::new("pizza").with_weight(2).with_tag("food"),
            WheelOption::new("movie").with_weight(0),
        ]);
        let (h, _) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "list").await,
            vec!["Current items on the wheel:\n\tpizza @ 2 [food]\n\tmovie @ 0"]
        );
    }

    #[tokio::test]
    async fn list_by_tag() {
        let wheel = Wheel::from_options(vec![
            WheelOption::new("pizza").with_tag("food"),
            WheelOption::new("movie"),
        ]);
        let (h, _) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "list food").await,
            vec!["Items on the wheel tagged 'food':\n\tpizza @ 1 [food]"]
        );
        assert_eq!(
            run(&h, "list drinks").await,
            vec!["No options found with the tag 'drinks'."]
        );
    }

    #[tokio::test]
    async fn list_corrupt_store_reads_empty() {
        let store = Arc::new(MemoryStore::with_raw("test", "{{{"));
        let h = WheelHandler::new(store, &StoreLocks::new(), WheelConfig::default());
        assert_eq!(run(&h, "list").await, vec![EMPTY_WHEEL]);
    }

    #[tokio::test]
    async fn spin_single_option() {
        let wheel = Wheel::from_options(vec![WheelOption::new("flag")]);
        let (h, store) = handler_with(Some(&wheel));
        let transcript = Transcript::new();
        h.handle("spin", &transcript).await.unwrap();

        let result = "The Wheel has Spoken! The result is flag";
        assert_eq!(transcript.messages(), vec![result]);
        assert_eq!(transcript.pinned(), vec![result]);
        assert_eq!(stored(&store).await.get("flag").unwrap().weight, 0);
    }

    #[tokio::test]
    async fn spin_sends_banner_then_edits() {
        let wheel = Wheel::from_options(vec![WheelOption::new("flag")]);
        let (h, _) = handler_with(Some(&wheel));
        let transcript = Transcript::new();
        h.handle("spin", &transcript).await.unwrap();

        let entries = transcript.entries();
        assert!(matches!(
            &entries[0],
            crate::TranscriptEntry::Sent { text, .. } if text == "Spinning the wheel..."
        ));
        assert!(matches!(&entries[1], crate::TranscriptEntry::Edited { .. }));
        assert!(matches!(&entries[2], crate::TranscriptEntry::Pinned { .. }));
    }

    #[tokio::test]
    async fn spin_rebalances_whole_wheel() {
        let wheel = Wheel::from_options(vec![
            WheelOption::new("only").with_weight(5).with_tag("red"),
            WheelOption::new("other").with_weight(2),
        ]);
        let (h, store) = handler_with(Some(&wheel));
        let replies = run(&h, "spin red").await;
        assert_eq!(replies, vec!["The Wheel has Spoken! The result is only"]);

        let after = stored(&store).await;
        assert_eq!(after.get("only").unwrap().weight, 0);
        assert_eq!(after.get("other").unwrap().weight, 3);
    }

    #[tokio::test]
    async fn spin_debug_leaves_weights() {
        let wheel = Wheel::from_options(vec![WheelOption::new("flag").with_weight(3)]);
        let (h, store) = handler_with(Some(&wheel));
        let replies = run(&h, "spin debug").await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].starts_with("The Wheel has Spoken! The result is flag"));
        assert!(replies[0].contains("3 of 3 tickets"));
        assert!(replies[0].contains("weights unchanged"));
        assert_eq!(store.save_count(), 0);
        assert_eq!(stored(&store).await, wheel);
    }

    #[tokio::test]
    async fn spin_debug_inside_tag_list() {
        let wheel = Wheel::from_options(vec![
            WheelOption::new("flag").with_tag("red"),
            WheelOption::new("cone"),
        ]);
        let (h, store) = handler_with(Some(&wheel));
        let replies = run(&h, "spin red,debug").await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].starts_with("The Wheel has Spoken! The result is flag"));
        assert!(replies[0].contains("weights unchanged"));
        assert_eq!(store.save_count(), 0);
        assert_eq!(stored(&store).await, wheel);
    }

    #[tokio::test]
    async fn spin_no_matching_tags() {
        let wheel = Wheel::from_options(vec![WheelOption::new("flag").with_tag("red")]);
        let (h, store) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "spin red,big").await,
            vec!["No options found with the given tags: red, big"]
        );
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn spin_empty_wheel() {
        let (h, store) = handler_with(None);
        assert_eq!(run(&h, "spin").await, vec![EMPTY_WHEEL]);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn spin_all_zero_weights() {
        let wheel = Wheel::from_options(vec![WheelOption::new("x").with_weight(0)]);
        let (h, store) = handler_with(Some(&wheel));
        let replies = run(&h, "spin").await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("weight 0"));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn spin_write_failure_is_reported() {
        let wheel = Wheel::from_options(vec![WheelOption::new("flag")]);
        let (h, store) = handler_with(Some(&wheel));
        store.set_fail_writes(true);
        let transcript = Transcript::new();
        h.handle("spin", &transcript).await.unwrap();

        let replies = transcript.messages();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].starts_with("Could not save the wheel"));
        assert!(transcript.pinned().is_empty());
        assert_eq!(stored(&store).await.get("flag").unwrap().weight, 1);
    }

    #[tokio::test]
    async fn repeated_spins_alternate_between_two() {
        let wheel = Wheel::from_options(vec![WheelOption::new("a"), WheelOption::new("b")]);
        let (h, _) = handler_with(Some(&wheel));
        // After the first draw the winner has weight 0, so the next draw must
        // pick the other option.
        let first = run(&h, "spin").await.remove(0);
        let second = run(&h, "spin").await.remove(0);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn tag_item() {
        let wheel = Wheel::from_options(vec![WheelOption::new("flag")]);
        let (h, store) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "tag red,big flag").await,
            vec!["Tagged 'flag' with: red, big"]
        );
        let after = stored(&store).await;
        assert!(after.get("flag").unwrap().has_all_tags(&["red", "big"]));
    }

    #[tokio::test]
    async fn tag_already_present() {
        let wheel = Wheel::from_options(vec![WheelOption::new("flag").with_tag("red")]);
        let (h, store) = handler_with(Some(&wheel));
        assert_eq!(
            run(&h, "tag red flag").await,
            vec!["'flag' is already tagged with: red"]
        );
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn tag_missing_item() {
        let (h, _) = handler_with(None);
        assert_eq!(
            run(&h, "tag red ghost").await,
            vec!["'ghost' not found in the wheel."]
        );
    }

    #[tokio::test]
    async fn tag_malformed() {
        let (h, _) = handler_with(None);
        assert_eq!(run(&h, "tag red").await, vec![help::usage(Verb::Tag, "$wheel")]);
        assert_eq!(run(&h, "tag").await, vec![help::usage(Verb::Tag, "$wheel")]);
        assert_eq!(run(&h, "tag red,,big flag").await, vec!["Tags cannot be empty."]);
    }

    #[tokio::test]
    async fn reset_weights() {
        let wheel = Wheel::from_options(vec![
            WheelOption::new("a").with_weight(7).with_tag("x"),
            WheelOption::new("b").with_weight(0),
        ]);
        let (h, store) = handler_with(Some(&wheel));
        assert_eq!(run(&h, "reset weights").await, vec!["Reset every weight to 1."]);
        let after = stored(&store).await;
        assert_eq!(after.get("a").unwrap().weight, 1);
        assert_eq!(after.get("b").unwrap().weight, 1);
        assert!(after.get("a").unwrap().has_tag("x"));
    }

    #[tokio::test]
    async fn reset_options_and_tags() {
        let wheel = Wheel::from_options(vec![WheelOption::new("a").with_tag("x")]);
        let (h, store) = handler_with(Some(&wheel));
        run(&h, "reset tags").await;
        assert!(stored(&store).await.get("a").unwrap().tags.is_empty());
        run(&h, "reset options").await;
        assert!(stored(&store).await.is_empty());
    }

    #[tokio::test]
    async fn reset_usage() {
        let (h, store) = handler_with(None);
        for input in ["reset", "reset help", "reset everything"] {
            assert_eq!(run(&h, input).await, vec![help::usage(Verb::Reset, "$wheel")]);
        }
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn help_summary_and_topics() {
        let (h, _) = handler_with(None);
        assert_eq!(run(&h, "help").await, vec![help::summary("$wheel")]);
        assert_eq!(
            run(&h, "help add remove").await,
            vec![help::usage(Verb::Add, "$wheel"), help::usage(Verb::Remove, "$wheel")]
        );
        let replies = run(&h, "help weather").await;
        assert!(replies[0].starts_with("No help for 'weather'."));
    }

    #[tokio::test]
    async fn unknown_command() {
        let (h, _) = handler_with(None);
        let replies = run(&h, "spni").await;
        assert_eq!(replies.len(), 1);
        assert!(replies[0].starts_with("Unknown command."));
        assert!(replies[0].contains("Did you mean `spin`?"));
    }

    #[tokio::test]
    async fn bare_prefix_shows_summary() {
        let (h, _) = handler_with(None);
        assert_eq!(run(&h, "$wheel").await, vec![help::summary("$wheel")]);
    }

    #[tokio::test]
    async fn replies_use_configured_prefix() {
        let wheel = Wheel::from_options(vec![WheelOption::new("x").with_weight(0)]);
        let store = Arc::new(MemoryStore::with_wheel("test", &wheel));
        let h = WheelHandler::new(
            store,
            &StoreLocks::new(),
            WheelConfig::default().with_seed(42).with_prefix("!spin"),
        );
        assert_eq!(run(&h, "!spin").await, vec![help::summary("!spin")]);
        assert_eq!(
            run(&h, "!spin help tag").await,
            vec![help::usage(Verb::Tag, "!spin")]
        );
        let replies = run(&h, "!spin spin").await;
        assert!(replies[0].contains("`!spin reset weights`"), "{replies:?}");
        for reply in run(&h, "!spin reset").await {
            assert!(!reply.contains("$wheel"), "{reply}");
        }
    }

    #[tokio::test]
    async fn add_write_failure_is_reported() {
        let (h, store) = handler_with(None);
        store.set_fail_writes(true);
        let replies = run(&h, "add pizza").await;
        assert!(replies[0].starts_with("Could not save the wheel"));
        assert!(stored(&store).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_share_one_store() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new("shared"));
        let locks = StoreLocks::new();
        let handler = Arc::new(WheelHandler::new(
            store.clone(),
            &locks,
            WheelConfig::default().with_seed(1),
        ));

        let mut tasks = Vec::new();
        for i in 0..20 {
            let handler = handler.clone();
            tasks.push(tokio::spawn(async move {
                let transcript = Transcript::new();
                handler
                    .handle(&format!("add item{i}"), &transcript)
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(stored(&store).await.len(), 20);
    }
}
