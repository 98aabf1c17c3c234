//! Flow control and the frame loop.
//!
//! A "flow" is the application logic driven by the loop: it is initialized
//! once, updated every frame and receives user commands in between. All hooks
//! run on one thread. Slow work (asset loading) is handed back to the loop as
//! a future via [`Out::FutFn`]; the loop polls it between frames and, once it
//! resolves, applies the resulting closure to the state. A frame therefore
//! never observes half-applied results.
//!
//! # Lifecycle
//!
//! 1. `on_init` is called once before the first frame
//! 2. every frame interval: `on_update` with the time since the last frame
//! 3. whenever a command arrives: `on_command`
//! 4. whenever a pending future resolves: its continuation runs on the state
//!
//! The loop ends when a hook returns [`Out::Exit`] or the configured frame
//! limit is reached.

use std::{future::Future, pin::Pin};

use futures::{Stream, StreamExt, stream::FuturesUnordered};
use instant::Duration;
use log::{debug, info};
use tokio::time::MissedTickBehavior;

use crate::context::Context;

/// A state mutation produced by an asynchronous operation.
pub type Continuation<S> = Box<dyn FnOnce(&mut S)>;

pub type FutContinuation<S> = Pin<Box<dyn Future<Output = Continuation<S>>>>;

///
/// Output type of every lifecycle hook.
///
/// `Out::FutFn` schedules futures whose resolved closures mutate the state
/// once they are ready. `Out::Exit` stops the loop after the current hook.
/// `Out::Empty` is the default when nothing needs to happen.
///
pub enum Out<S> {
    FutFn(Vec<FutContinuation<S>>),
    Exit,
    Empty,
}

impl<S> Default for Out<S> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Application logic driven by [`run`].
pub trait GraphicsFlow<S, C> {
    /// Called once before the first frame.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out<S>;

    /// Called every frame with the elapsed time `dt` since the previous frame.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out<S>;

    /// Called for every command received from the command stream.
    fn on_command(&mut self, ctx: &Context, state: &mut S, command: C) -> Out<S>;
}

enum Control {
    Continue,
    Exit,
}

fn schedule<S>(out: Out<S>, pending: &mut FuturesUnordered<FutContinuation<S>>) -> Control {
    match out {
        Out::FutFn(futures) => {
            pending.extend(futures);
            Control::Continue
        }
        Out::Exit => Control::Exit,
        Out::Empty => Control::Continue,
    }
}

/// Run `flow` until it exits or the frame limit is reached.
///
/// Commands are read from `commands`; when that stream ends the loop keeps
/// rendering frames. Must be awaited on a single-threaded executor context;
/// nothing here is `Send`.
pub async fn run<S, C>(
    flow: &mut dyn GraphicsFlow<S, C>,
    state: &mut S,
    ctx: &mut Context,
    commands: impl Stream<Item = C>,
) -> anyhow::Result<()> {
    let mut commands = std::pin::pin!(commands);
    let mut pending: FuturesUnordered<FutContinuation<S>> = FuturesUnordered::new();

    if let Control::Exit = schedule(flow.on_init(ctx, state), &mut pending) {
        return Ok(());
    }

    let mut interval = tokio::time::interval(ctx.frame_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut commands_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let dt = ctx.begin_frame();
                let out = flow.on_update(ctx, state, dt);
                ctx.end_frame();
                if let Control::Exit = schedule(out, &mut pending) {
                    break;
                }
                if ctx.frame_limit_reached() {
                    info!("Frame limit of {} reached", ctx.frame());
                    break;
                }
            }
            command = commands.next(), if commands_open => match command {
                Some(command) => {
                    let out = flow.on_command(ctx, state, command);
                    if let Control::Exit = schedule(out, &mut pending) {
                        break;
                    }
                }
                None => {
                    debug!("Command stream closed");
                    commands_open = false;
                }
            },
            Some(continuation) = pending.next(), if !pending.is_empty() => {
                continuation(state);
            }
        }
    }
    info!(
        "Stopped after {} frames ({:.1?})",
        ctx.frame(),
        ctx.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;
    use crate::config::Config;

    #[derive(Default)]
    struct Counter {
        frames: u64,
        commands: Vec<u32>,
        loaded: bool,
        loaded_at_frame: Option<u64>,
    }

    struct CountingFlow;

    impl GraphicsFlow<Counter, u32> for CountingFlow {
        fn on_init(&mut self, _: &mut Context, _: &mut Counter) -> Out<Counter> {
            let load: FutContinuation<Counter> = Box::pin(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Box::new(|state: &mut Counter| {
                    state.loaded = true;
                    state.loaded_at_frame = Some(state.frames);
                }) as Continuation<Counter>
            });
            Out::FutFn(vec![load])
        }

        fn on_update(&mut self, _: &Context, state: &mut Counter, _: Duration) -> Out<Counter> {
            state.frames += 1;
            Out::Empty
        }

        fn on_command(&mut self, _: &Context, state: &mut Counter, command: u32) -> Out<Counter> {
            state.commands.push(command);
            if command == 0 { Out::Exit } else { Out::Empty }
        }
    }

    fn ctx(max_frames: Option<u64>) -> Context {
        let mut config = Config::default();
        config.frame.frame_rate = 500.0;
        config.frame.max_frames = max_frames;
        Context::new(config)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stops_at_frame_limit_and_applies_continuations() {
        let mut state = Counter::default();
        let mut ctx = ctx(Some(20));
        run(&mut CountingFlow, &mut state, &mut ctx, stream::empty())
            .await
            .unwrap();
        assert_eq!(state.frames, 20);
        assert_eq!(ctx.frame(), 20);
        assert!(state.loaded);
        assert!(state.loaded_at_frame.is_some_and(|frame| frame > 0));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unvalidated_frame_rate_does_not_stall_or_panic() {
        let mut state = Counter::default();
        let mut ctx = ctx(Some(3));
        ctx.config.frame.frame_rate = 1e12;
        run(&mut CountingFlow, &mut state, &mut ctx, stream::empty())
            .await
            .unwrap();
        assert_eq!(state.frames, 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn exit_command_stops_the_loop() {
        let mut state = Counter::default();
        let mut ctx = ctx(None);
        let commands = stream::iter(vec![3, 2, 0, 7]);
        run(&mut CountingFlow, &mut state, &mut ctx, commands)
            .await
            .unwrap();
        assert_eq!(state.commands, vec![3, 2, 0]);
    }
}
