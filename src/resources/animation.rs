//! Keyframe animation clips and a scrub-able player for them.

use cgmath::{InnerSpace, VectorSpace};

use crate::data_structures::{
    instance::Instance,
    scene_graph::{NodeId, SceneGraph},
};

#[derive(Clone, Debug)]
pub enum Keyframes {
    Translation(Vec<cgmath::Vector3<f32>>),
    Rotation(Vec<cgmath::Quaternion<f32>>),
    Scale(Vec<cgmath::Vector3<f32>>),
    Other,
}

/// One animated property of one node.
#[derive(Clone, Debug)]
pub struct AnimationChannel {
    pub target: NodeId,
    pub keyframes: Keyframes,
    pub timestamps: Vec<f32>,
}

/// An animation clip: a named set of channels with keyframes and timing.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<AnimationChannel>,
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, channels: Vec<AnimationChannel>) -> Self {
        let duration = channels
            .iter()
            .filter_map(|c| c.timestamps.last().copied())
            .fold(0.0, f32::max);
        Self {
            name: name.into(),
            channels,
            duration,
        }
    }

    /// Rewrite every channel target through `mapping` (old handle -> new handle).
    /// Channels whose target has no mapping are dropped.
    pub fn retarget(mut self, mapping: &[Option<NodeId>]) -> Self {
        self.channels.retain_mut(|channel| {
            match mapping.get(channel.target.0).copied().flatten() {
                Some(target) => {
                    channel.target = target;
                    true
                }
                None => false,
            }
        });
        self
    }
}

/// Locate `time` between two keyframes: (lower index, upper index, blend factor).
fn bracket(timestamps: &[f32], time: f32) -> Option<(usize, usize, f32)> {
    let last = timestamps.len().checked_sub(1)?;
    if time <= timestamps[0] {
        return Some((0, 0, 0.0));
    }
    if time >= timestamps[last] {
        return Some((last, last, 0.0));
    }
    let upper = timestamps.partition_point(|&t| t <= time);
    let lower = upper - 1;
    let span = timestamps[upper] - timestamps[lower];
    let factor = if span > 0.0 {
        (time - timestamps[lower]) / span
    } else {
        0.0
    };
    Some((lower, upper, factor))
}

impl AnimationChannel {
    fn apply(&self, time: f32, scene: &mut SceneGraph) {
        let Some((lo, hi, t)) = bracket(&self.timestamps, time) else {
            return;
        };
        let Some(node) = scene.node_mut(self.target) else {
            return;
        };
        match &self.keyframes {
            Keyframes::Translation(values) => {
                if let (Some(a), Some(b)) = (values.get(lo), values.get(hi)) {
                    node.local.position = a.lerp(*b, t);
                }
            }
            Keyframes::Rotation(values) => {
                if let (Some(a), Some(b)) = (values.get(lo), values.get(hi)) {
                    let rotation = a.slerp(*b, t).normalize();
                    let (position, scale) = (node.local.position, node.local.scale);
                    node.local = Instance::from_trs(position.into(), rotation, scale.into());
                }
            }
            Keyframes::Scale(values) => {
                if let (Some(a), Some(b)) = (values.get(lo), values.get(hi)) {
                    node.local.scale = a.lerp(*b, t);
                }
            }
            Keyframes::Other => {}
        }
    }
}

/// A playable instance of a clip.
///
/// The action only poses the scene once `play()` was called. Its clock runs at
/// `time_scale`; with a scale of zero the position is set exclusively through
/// [`AnimationAction::set_time`].
#[derive(Clone, Debug)]
pub struct AnimationAction {
    clip: AnimationClip,
    time: f32,
    pub time_scale: f32,
    playing: bool,
}

impl AnimationAction {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            playing: false,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Scrub to `time` seconds, clamped to the clip.
    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.clip.duration);
    }

    /// Advance the clip's own clock by `dt` seconds and pose the scene.
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph) {
        if !self.playing {
            return;
        }
        self.set_time(self.time + dt * self.time_scale);
        self.apply(scene);
    }

    /// Pose the scene at the current time without advancing the clock.
    pub fn apply(&self, scene: &mut SceneGraph) {
        if !self.playing {
            return;
        }
        for channel in &self.clip.channels {
            channel.apply(self.time, scene);
        }
    }
}
