//! Element builder (C4): joins zones with templates and renders variants.
//!
//! Grounded in `original_source/internal/ProviderLoopupTable.py` and
//! `internal/LookupElement.py`: the partial-failure policy matrix that
//! decides which snapshot (fresh vs cached) feeds the rebuild, the
//! fallback-to-cached-template join, and the literal `{{ .Filename }}` /
//! `{{ .Contact }}` substitution.

use crate::core::template::Template;
use crate::core::zone::Zone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub zone: Zone,
    pub template_name: String,
    pub rendered: String,
}

/// Outcome of a fresh zones/templates load attempt feeding the builder.
pub struct LoadOutcome {
    pub zones: Option<Vec<Zone>>,
    pub templates: Option<Vec<Template>>,
}

/// Result of one build pass: the snapshots to retain plus the elements
/// derived from them, or `None` when both loads failed and nothing
/// should change (§4.4, "no update").
pub struct BuildResult {
    pub zones: Vec<Zone>,
    pub templates: Vec<Template>,
    pub elements: Vec<Element>,
}

/// Join `cached_zones`/`cached_templates` (the previous snapshot) against
/// `fresh` (this cycle's load attempt), following the partial-failure
/// policy matrix, then render an [`Element`] per surviving zone.
pub fn build_elements(
    cached_zones: &[Zone],
    cached_templates: &[Template],
    fresh: LoadOutcome,
    contact_info: &str,
) -> Option<BuildResult> {
    let (zones, mut templates) = match (fresh.zones, fresh.templates) {
        (None, None) => {
            tracing::error!("completely failed to load zones and templates, keeping cached data");
            return None;
        }
        (None, Some(templates)) => {
            tracing::error!("failed to load zones, rebuilding with cached zones and fresh templates");
            (cached_zones.to_vec(), templates)
        }
        (Some(zones), None) => {
            tracing::error!("failed to load templates, rebuilding with fresh zones and cached templates");
            (zones, cached_templates.to_vec())
        }
        (Some(zones), Some(templates)) => (zones, templates),
    };

    let mut elements = Vec::with_capacity(zones.len());

    for zone in zones.iter() {
        let matched = templates
            .iter()
            .find(|t| t.name == zone.template_name)
            .cloned();

        let template = match matched {
            Some(t) => t,
            None => match cached_templates.iter().find(|t| t.name == zone.template_name) {
                Some(t) => {
                    tracing::warn!(
                        template = %zone.template_name,
                        "unknown template, using cached version"
                    );
                    let t = t.clone();
                    templates.push(t.clone());
                    t
                }
                None => {
                    tracing::warn!(
                        template = %zone.template_name,
                        zone = %zone.prefix,
                        "unknown template, no cached version available, skipping zone"
                    );
                    continue;
                }
            },
        };

        let rendered = render(&template.body, &template.name, contact_info);
        elements.push(Element {
            zone: zone.clone(),
            template_name: template.name.clone(),
            rendered,
        });
    }

    Some(BuildResult {
        zones,
        templates,
        elements,
    })
}

fn render(body: &str, filename: &str, contact_info: &str) -> String {
    body.replace("{{ .Filename }}", filename)
        .replace("{{ .Contact }}", contact_info)
}
