//! Template synthesis.
//!
//! Synthesis is a pure projection of the constructed graph into the
//! declarative [`PipelineTemplate`]; it allocates nothing new in the
//! graph and can be repeated with identical results.

mod template;

pub use template::{
    OutputTemplate, PipelineTemplate, ResourceTemplate, StackTemplate, StageTemplate,
    StepTemplate,
};

use crate::outputs::OutputProvider;
use crate::pipeline::Pipeline;
use crate::stack::Stack;
use crate::stage::Stage;
use std::collections::BTreeMap;
use tracing::debug;

impl Pipeline {
    /// Synthesizes the declarative template for the external deployment
    /// engine.
    #[must_use]
    pub fn synth(&self) -> PipelineTemplate {
        let template = PipelineTemplate {
            name: self.name().to_string(),
            source: self.source().clone(),
            synth_commands: self.synth_commands().to_vec(),
            stage: synth_stage(self.stage()),
            post_steps: self
                .validation_steps()
                .iter()
                .map(|step| StepTemplate {
                    name: step.name().to_string(),
                    env: step
                        .env()
                        .iter()
                        .map(|(var, handle)| (var.clone(), handle.token().to_string()))
                        .collect::<BTreeMap<_, _>>(),
                    commands: step.commands().to_vec(),
                })
                .collect(),
        };
        debug!(pipeline = %self.scope(), steps = template.post_steps.len(), "synthesized template");
        template
    }
}

fn synth_stage(stage: &Stage) -> StageTemplate {
    StageTemplate {
        path: stage.scope().path(),
        stack: synth_stack(stage.stack()),
        exposed: stage
            .output_names()
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}

fn synth_stack(stack: &Stack) -> StackTemplate {
    StackTemplate {
        path: stack.scope().path(),
        resources: stack
            .resources()
            .iter()
            .map(|r| ResourceTemplate {
                name: r.name.clone(),
                kind: r.kind.clone(),
                properties: r.properties.clone(),
            })
            .collect(),
        outputs: stack
            .output_names()
            .iter()
            .map(|name| OutputTemplate {
                name: (*name).to_string(),
                token: stack
                    .output(name)
                    .map(|h| h.token().to_string())
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{CodeSource, PipelineBuilder, ValidationStep};
    use crate::scope::Scope;
    use crate::stack::Resource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_pipeline() -> Pipeline {
        let mut stage = Stage::build(&Scope::root(), "Prod", |scope| {
            let mut stack = Stack::new(scope, "App")?;
            stack.add_resource(
                Resource::new("Frontend", "sample::Distribution")
                    .with_properties(json!({"default_root": "index.html"})),
            )?;
            stack.add_output("ViewerURL")?;
            stack.add_output("EndpointURL")?;
            Ok(stack)
        })
        .unwrap();
        stage.expose_all();

        PipelineBuilder::new(&Scope::root(), "Workshop")
            .source(CodeSource::new("workshop-repo", "main"))
            .synth_commands(["npm ci", "npm run build", "npx synth"])
            .deploy(stage)
            .unwrap()
            .validation(
                ValidationStep::new("TestEndpoint")
                    .bind("ENDPOINT_URL", "EndpointURL")
                    .command("curl -Ssf $ENDPOINT_URL"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_bindings_survive_as_tokens() {
        let template = sample_pipeline().synth();

        assert_eq!(template.post_steps.len(), 1);
        let step = &template.post_steps[0];
        assert_eq!(
            step.env.get("ENDPOINT_URL").map(String::as_str),
            Some("${stagewire:Prod/App:EndpointURL}")
        );
        assert_eq!(step.commands, vec!["curl -Ssf $ENDPOINT_URL"]);
    }

    #[test]
    fn test_stage_and_stack_shape() {
        let template = sample_pipeline().synth();

        assert_eq!(template.stage.path, "Prod");
        assert_eq!(template.stage.stack.path, "Prod/App");
        assert_eq!(template.stage.exposed, vec!["ViewerURL", "EndpointURL"]);
        assert_eq!(template.stage.stack.resources.len(), 1);
        assert_eq!(template.stage.stack.outputs.len(), 2);
        assert_eq!(
            template.stage.stack.outputs[0].token,
            "${stagewire:Prod/App:ViewerURL}"
        );
    }

    #[test]
    fn test_synth_is_repeatable() {
        let pipeline = sample_pipeline();
        assert_eq!(pipeline.synth(), pipeline.synth());
    }

    #[test]
    fn test_template_json_round_trip() {
        let template = sample_pipeline().synth();
        let json = template.to_json_pretty().unwrap();
        let back: PipelineTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }
}
