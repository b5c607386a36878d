//! Integrity gate
//!
//! Runs the project's build and then its tests. A non-zero exit, a timeout,
//! or a command that cannot start all count as a failed gate. Nothing is
//! retried.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::process::run_shell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStage {
    Build,
    Test,
}

impl std::fmt::Display for GateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateStage::Build => write!(f, "build"),
            GateStage::Test => write!(f, "test"),
        }
    }
}

/// `Unknown → Running(Build) → Running(Test) → Passed`, with `Failed` reachable
/// from either running stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unknown,
    Running(GateStage),
    Passed,
    Failed(GateStage),
}

#[derive(Debug, Clone)]
pub struct StageOutput {
    pub stage: GateStage,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

#[derive(Debug, Clone)]
pub struct IntegrityResult {
    pub passed: bool,
    pub failed_stage: Option<GateStage>,
    /// Output of each stage that ran, in order.
    pub stages: Vec<StageOutput>,
}

impl IntegrityResult {
    pub fn from_stages(stages: Vec<StageOutput>) -> Self {
        let failed_stage = stages.iter().find(|s| !s.success).map(|s| s.stage);
        Self {
            passed: failed_stage.is_none(),
            failed_stage,
            stages,
        }
    }

    pub fn failure_output(&self) -> Option<&StageOutput> {
        self.stages.iter().find(|s| !s.success)
    }
}

#[async_trait]
pub trait IntegrityGate: Send {
    /// Run to completion and report pass or fail.
    async fn check(&mut self) -> IntegrityResult;

    fn state(&self) -> GateState;
}

/// Gate backed by the configured build and test shell commands.
pub struct CommandGate {
    build: String,
    test: String,
    cwd: PathBuf,
    timeout: Duration,
    state: GateState,
}

impl CommandGate {
    pub fn new(
        build: impl Into<String>,
        test: impl Into<String>,
        cwd: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            build: build.into(),
            test: test.into(),
            cwd: cwd.into(),
            timeout,
            state: GateState::Unknown,
        }
    }

    async fn run_stage(&mut self, stage: GateStage) -> StageOutput {
        self.state = GateState::Running(stage);
        let command = match stage {
            GateStage::Build => &self.build,
            GateStage::Test => &self.test,
        };
        tracing::debug!(%stage, command = command.as_str(), "running gate stage");

        match run_shell(command, &self.cwd, self.timeout).await {
            Ok(out) => StageOutput {
                stage,
                success: out.success,
                stdout: out.stdout,
                stderr: out.stderr,
                timed_out: out.timed_out,
            },
            Err(e) => StageOutput {
                stage,
                success: false,
                stdout: String::new(),
                stderr: format!("{:#}", e),
                timed_out: false,
            },
        }
    }
}

#[async_trait]
impl IntegrityGate for CommandGate {
    async fn check(&mut self) -> IntegrityResult {
        let mut stages = Vec::with_capacity(2);

        for stage in [GateStage::Build, GateStage::Test] {
            let output = self.run_stage(stage).await;
            let success = output.success;
            stages.push(output);
            if !success {
                self.state = GateState::Failed(stage);
                return IntegrityResult::from_stages(stages);
            }
        }

        self.state = GateState::Passed;
        IntegrityResult::from_stages(stages)
    }

    fn state(&self) -> GateState {
        self.state
    }
}
