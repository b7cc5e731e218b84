//! Run Ensemble use case
//!
//! Orchestrates the full fan-out / collect / aggregate flow: N invocation
//! tasks under a concurrency ceiling, completions streamed into the
//! clusterer in completion order, early-stop cancellation of outstanding
//! work, and a majority vote over whatever survived.

use crate::config::{AggregationMethod, ConfigError, EnsembleConfig};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use ensemble_domain::{
    AgentResponse, EnsembleMetadata, EnsembleOutcome, EnsembleResult, InsufficientResponses,
    Question, ResponseClusterer, current_timestamp, majority_vote,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a careful assistant. Answer the question directly and concisely.";

/// Errors that can occur during ensemble execution.
///
/// Per-invocation failures and quorum shortfalls are not errors; the only
/// fatal outcome is a configuration that fails validation before dispatch.
#[derive(Error, Debug)]
pub enum RunEnsembleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Input for the RunEnsemble use case
#[derive(Debug, Clone)]
pub struct RunEnsembleInput {
    /// The question every agent answers
    pub question: Question,
    /// System prompt shared by every invocation
    pub system_prompt: String,
    /// Fully-resolved run configuration
    pub config: EnsembleConfig,
}

impl RunEnsembleInput {
    pub fn new(question: impl Into<Question>, config: EnsembleConfig) -> Self {
        Self {
            question: question.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            config,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }
}

/// What one invocation task reports back to the collector
enum TaskOutcome {
    Completed(AgentResponse),
    Failed { agent_id: usize, error: GatewayError },
    Cancelled,
}

/// Single-writer aggregation point for completing tasks.
///
/// Every mutation of the cluster partition and the running counts happens
/// here, serialized through the collect loop, so the partition itself
/// needs no locking.
struct Collector {
    clusterer: ResponseClusterer,
    succeeded: usize,
    failed: usize,
    total_latency: Duration,
}

impl Collector {
    fn new(config: &EnsembleConfig) -> Self {
        Self {
            clusterer: ResponseClusterer::new(config.similarity_threshold),
            succeeded: 0,
            failed: 0,
            total_latency: Duration::ZERO,
        }
    }

    fn record_success(&mut self, response: AgentResponse) {
        self.succeeded += 1;
        self.total_latency += response.execution_time;
        self.clusterer.insert(response);
    }

    fn record_failure(&mut self) {
        self.failed += 1;
    }

    fn avg_response_time(&self) -> Duration {
        if self.succeeded == 0 {
            Duration::ZERO
        } else {
            self.total_latency / self.succeeded as u32
        }
    }
}

/// Use case for running one ensemble over one question
pub struct RunEnsembleUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: LlmGateway + 'static> RunEnsembleUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunEnsembleInput,
    ) -> Result<EnsembleOutcome, RunEnsembleError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunEnsembleInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<EnsembleOutcome, RunEnsembleError> {
        input.config.validate()?;
        let config = &input.config;

        let started = Instant::now();
        let temperatures = config.temperature_schedule().sample(config.num_agents);

        info!(
            "Starting ensemble: {} agents, max {} concurrent",
            config.num_agents, config.max_concurrent
        );
        progress.on_run_start(config.num_agents);

        let mut collector = Collector::new(config);
        if config.parallel_execution {
            self.fan_out(&input, &temperatures, progress, &mut collector)
                .await;
        } else {
            self.run_sequential(&input, &temperatures, progress, &mut collector)
                .await;
        }

        progress.on_run_complete(collector.succeeded, collector.failed);

        Ok(self.aggregate(&input, collector, started))
    }

    /// Concurrent fan-out: every task waits on the semaphore, performs one
    /// invocation, and reports back through the join set. Results are
    /// consumed in completion order, which is what lets the early-stop
    /// check observe clusters growing in real time.
    async fn fan_out(
        &self,
        input: &RunEnsembleInput,
        temperatures: &[f64],
        progress: &dyn ProgressNotifier,
        collector: &mut Collector,
    ) {
        let config = &input.config;
        let policy = config.early_stop_policy();
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));
        let cancellation = CancellationToken::new();
        let mut join_set = JoinSet::new();

        for (agent_id, temperature) in temperatures.iter().copied().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let semaphore = Arc::clone(&semaphore);
            let token = cancellation.clone();
            let request = CompletionRequest {
                question: input.question.content().to_string(),
                system_prompt: input.system_prompt.clone(),
                temperature,
                timeout: config.timeout(),
            };

            join_set.spawn(async move {
                let _permit = tokio::select! {
                    _ = token.cancelled() => return TaskOutcome::Cancelled,
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return TaskOutcome::Cancelled,
                    },
                };

                tokio::select! {
                    _ = token.cancelled() => TaskOutcome::Cancelled,
                    result = gateway.complete(request) => match result {
                        Ok(completion) => TaskOutcome::Completed(AgentResponse::new(
                            agent_id,
                            completion.content,
                            temperature,
                            completion.elapsed,
                        )),
                        Err(error) => TaskOutcome::Failed { agent_id, error },
                    },
                }
            });
        }

        // A task past its cancellation check can still complete after the
        // signal; such late arrivals are discarded, never merged.
        let mut stopped = false;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(TaskOutcome::Completed(response)) => {
                    if stopped {
                        debug!(
                            agent_id = response.agent_id,
                            "Discarding response that arrived after the stop signal"
                        );
                        continue;
                    }
                    let agent_id = response.agent_id;
                    collector.record_success(response);
                    progress.on_agent_complete(agent_id, true);
                    debug!(
                        agent_id,
                        clusters = collector.clusterer.clusters().len(),
                        "Agent completed"
                    );

                    if policy.should_stop(&collector.clusterer) {
                        stopped = true;
                        cancellation.cancel();
                        let fraction = collector.clusterer.largest_cluster_fraction();
                        info!(
                            responses = collector.succeeded,
                            "Early stop: {:.1}% of responses agree, cancelling outstanding agents",
                            fraction * 100.0
                        );
                        progress.on_early_stop(collector.succeeded, fraction);
                    }
                }
                Ok(TaskOutcome::Failed { agent_id, error }) => {
                    if stopped {
                        continue;
                    }
                    warn!("Agent {} failed: {}", agent_id, error);
                    collector.record_failure();
                    progress.on_agent_complete(agent_id, false);
                }
                Ok(TaskOutcome::Cancelled) => {}
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
    }

    /// One invocation at a time. Same streaming insertion and early-stop
    /// semantics as the concurrent path, without the semaphore.
    async fn run_sequential(
        &self,
        input: &RunEnsembleInput,
        temperatures: &[f64],
        progress: &dyn ProgressNotifier,
        collector: &mut Collector,
    ) {
        let config = &input.config;
        let policy = config.early_stop_policy();

        for (agent_id, temperature) in temperatures.iter().copied().enumerate() {
            let request = CompletionRequest {
                question: input.question.content().to_string(),
                system_prompt: input.system_prompt.clone(),
                temperature,
                timeout: config.timeout(),
            };

            match self.gateway.complete(request).await {
                Ok(completion) => {
                    collector.record_success(AgentResponse::new(
                        agent_id,
                        completion.content,
                        temperature,
                        completion.elapsed,
                    ));
                    progress.on_agent_complete(agent_id, true);

                    if policy.should_stop(&collector.clusterer) {
                        let fraction = collector.clusterer.largest_cluster_fraction();
                        info!(
                            responses = collector.succeeded,
                            "Early stop: {:.1}% of responses agree, skipping remaining agents",
                            fraction * 100.0
                        );
                        progress.on_early_stop(collector.succeeded, fraction);
                        break;
                    }
                }
                Err(error) => {
                    warn!("Agent {} failed: {}", agent_id, error);
                    collector.record_failure();
                    progress.on_agent_complete(agent_id, false);
                }
            }
        }
    }

    /// Quorum check, majority vote, and metadata assembly
    fn aggregate(
        &self,
        input: &RunEnsembleInput,
        collector: Collector,
        started: Instant,
    ) -> EnsembleOutcome {
        let config = &input.config;

        // Voting over an empty set is meaningless even with a zero quorum
        let required = config.min_successful_responses.max(1);
        if collector.succeeded < required {
            info!(
                "Insufficient responses: {}/{} required",
                collector.succeeded, required
            );
            return EnsembleOutcome::Insufficient(InsufficientResponses::new(
                collector.succeeded,
                required,
            ));
        }

        let avg_response_time = collector.avg_response_time();
        let (succeeded, failed) = (collector.succeeded, collector.failed);

        let result = match config.aggregation_method {
            AggregationMethod::MajorityVote => majority_vote(
                collector.clusterer.into_clusters(),
                config.min_consensus_fraction(),
            ),
        };

        info!(
            "Consensus: {:.1}% ({}/{} agents), meets threshold: {}",
            result.consensus_percentage * 100.0,
            result.supporting_agents,
            result.total_agents,
            result.meets_consensus
        );

        let result =
            self.attach_metadata(config, result, succeeded, failed, avg_response_time, started);

        EnsembleOutcome::Completed(result)
    }

    fn attach_metadata(
        &self,
        config: &EnsembleConfig,
        result: EnsembleResult,
        succeeded: usize,
        failed: usize,
        avg_response_time: Duration,
        started: Instant,
    ) -> EnsembleResult {
        if !config.include_metadata {
            return result;
        }

        result.with_metadata(EnsembleMetadata {
            agents_executed: succeeded + failed,
            agents_succeeded: succeeded,
            execution_time: started.elapsed(),
            avg_response_time,
            temperature_range: config.vary_temperature.then_some(config.temperature_range),
            timestamp: current_timestamp(),
        })
    }
}
