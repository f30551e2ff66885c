// SPDX-License-Identifier: MIT

//! Post templates - named hook/body/call-to-action skeletons

use crate::adk::error::LinkpostError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub hook: String,
    pub body: String,
    pub cta: String,
}

impl Template {
    fn new(hook: &str, body: &str, cta: &str) -> Self {
        Self {
            hook: hook.to_string(),
            body: body.to_string(),
            cta: cta.to_string(),
        }
    }

    /// Hook, body and call-to-action separated by blank lines
    pub fn render(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.hook, self.body, self.cta)
    }
}

/// Name to template lookup that remembers insertion order
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Template>,
    order: Vec<String>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four stock templates
    pub fn builtin() -> Self {
        let mut store = Self::new();
        store.insert(
            "personal_story",
            Template::new(
                "I failed at X — and it turned out to be the best thing that happened to my career.",
                "Context: [Describe the situation]\nMistake: [What went wrong]\nLesson: [What I learned]\nTakeaway: [Actionable advice]",
                "What’s one mistake you learned from? I’ll read and reply.",
            ),
        );
        store.insert(
            "mini_list",
            Template::new(
                "5 quick things that improved our onboarding conversion by 30%.",
                "- Tip 1\n- Tip 2\n- Tip 3\n- Tip 4\n- Tip 5",
                "Want the template? DM me.",
            ),
        );
        store.insert(
            "results_breakdown",
            Template::new(
                "How we cut support tickets by 42% in 6 weeks.",
                "Problem: [Describe issue]\nApproach: [What we did]\nMetrics: [Results]\nChart: [Suggestion for image]",
                "If you want the playbook, comment ‘playbook’.",
            ),
        );
        store.insert(
            "opinion",
            Template::new(
                "Opinion: [Controversial statement].",
                "Reason 1: [Explanation]\nReason 2: [Explanation]\nCounterpoint: [Address objection]",
                "Agree or disagree — what would you do differently?",
            ),
        );
        store
    }

    /// Add or replace a template; replacing keeps the original position
    pub fn insert(&mut self, name: impl Into<String>, template: Template) {
        let name = name.into();
        if self.templates.insert(name.clone(), template).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Template names in insertion order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Merge templates from a YAML mapping of `name: {hook, body, cta}`
    pub fn merge_yaml(&mut self, yaml: &str) -> Result<usize, LinkpostError> {
        let parsed: serde_yaml::Mapping = serde_yaml::from_str(yaml)?;
        let entries = parsed
            .into_iter()
            .map(|(key, value)| {
                Ok((
                    serde_yaml::from_value::<String>(key)?,
                    serde_yaml::from_value::<Template>(value)?,
                ))
            })
            .collect::<Result<Vec<_>, serde_yaml::Error>>()?;

        let added = entries.len();
        for (name, template) in entries {
            self.insert(name, template);
        }
        Ok(added)
    }

    pub fn merge_yaml_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, LinkpostError> {
        let content = fs::read_to_string(path)?;
        self.merge_yaml(&content)
    }
}
