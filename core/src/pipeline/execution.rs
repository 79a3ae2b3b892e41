// core/src/pipeline/execution.rs

//! `Pipeline::run()`.

use tracing::{event, instrument, Instrument, Level};

use super::context_data::ContextData;
use super::control::{PipelineControl, PipelineResult};
use super::definition::{Handler, Pipeline};
use crate::error::PipelineError;

enum Phase {
  Finished,
  Stopped,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every step in order against `ctx_data`.
  ///
  /// The first handler error aborts the run. Before it is returned, the
  /// compensations of steps that already finished run newest first.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");
    let mut completed: Vec<&str> = Vec::with_capacity(self.steps.len());

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = tracing::info_span!(
        "pipeline_step_execution",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      let on_handlers = self.on.get(step_name).filter(|v| !v.is_empty());
      let after_handlers = self.after.get(step_name).filter(|v| !v.is_empty());

      if on_handlers.is_none() && after_handlers.is_none() {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(PipelineError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let outcome = async {
        for handlers in [on_handlers, after_handlers].into_iter().flatten() {
          if let Phase::Stopped = run_handlers(handlers, &ctx_data).await? {
            return Ok(Phase::Stopped);
          }
        }
        Ok::<_, Err>(Phase::Finished)
      }
      .instrument(step_span.clone())
      .await;

      match outcome {
        Ok(Phase::Finished) => completed.push(step_name),
        Ok(Phase::Stopped) => {
          event!(parent: &step_span, Level::INFO, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped);
        }
        Err(e) => {
          event!(parent: &step_span, Level::ERROR, error = %e, "Step failed.");
          self.run_compensations(&completed, &ctx_data).await;
          return Err(e);
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }

  async fn run_compensations(&self, completed: &[&str], ctx_data: &ContextData<TData>) {
    for step_name in completed.iter().rev() {
      if let Some(compensation) = self.compensations.get(*step_name) {
        match compensation(ctx_data.clone()).await {
          Ok(()) => event!(Level::INFO, step_name = %step_name, "Compensated step."),
          Err(e) => event!(Level::WARN, step_name = %step_name, error = %e, "Compensation failed."),
        }
      }
    }
  }
}

async fn run_handlers<TData, Err>(handlers: &[Handler<TData, Err>], ctx_data: &ContextData<TData>) -> Result<Phase, Err>
where
  TData: 'static + Send + Sync,
{
  for handler_fn in handlers {
    if let PipelineControl::Stop = handler_fn(ctx_data.clone()).await? {
      return Ok(Phase::Stopped);
    }
  }
  Ok(Phase::Finished)
}
