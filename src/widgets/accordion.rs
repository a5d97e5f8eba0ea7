//! Accordion - exclusive (or multi-open) collapsible sections.
//!
//! Structure: the widget element holds `.accordion-item` children, each
//! with an `.accordion-header` trigger and an `.accordion-collapse` panel.
//! Clicking a header toggles its panel; unless `multiple` is set, opening
//! one section collapses the others. Lifecycle events are emitted on the
//! panel that changed, not on the accordion root.

use crate::toolkit::Context;
use crate::types::{Caps, ElementId, CLASS_SHOW};
use crate::widgets::core::{Config, ConfigValue, InstanceCore};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "accordion";
const CLASS_ITEM: &str = "accordion-item";
const CLASS_HEADER: &str = "accordion-header";
const CLASS_PANEL: &str = "accordion-collapse";

const DEFAULTS: &[(&str, ConfigValue)] = &[("multiple", ConfigValue::Bool(false))];

#[derive(Debug)]
pub struct Accordion {
    core: InstanceCore,
    config: Config,
}

struct Section {
    header: ElementId,
    panel: ElementId,
}

impl Accordion {
    pub fn create(dom: &crate::dom::Document, element: ElementId, overrides: &Config) -> Widget {
        let config = Config::resolve(COMPONENT, DEFAULTS, dom, element, overrides);
        Widget::Accordion(Self {
            core: InstanceCore::new(COMPONENT),
            config,
        })
    }

    /// Sections are re-resolved per interaction so host-added items join in.
    fn sections(&self, ctx: &Context, element: ElementId) -> Vec<Section> {
        ctx.dom
            .children_with_class(element, CLASS_ITEM)
            .into_iter()
            .filter_map(|item| {
                let header = ctx.dom.descendant_with_class(item, CLASS_HEADER)?;
                let panel = ctx.dom.descendant_with_class(item, CLASS_PANEL)?;
                Some(Section { header, panel })
            })
            .collect()
    }

    fn expand(&self, ctx: &mut Context, inst: InstanceRef, section: &Section) {
        if !self.core.emit_on(ctx, section.panel, inst, "show") {
            return;
        }
        ctx.dom.add_class(section.panel, CLASS_SHOW);
        ctx.dom.set_attr(section.header, "aria-expanded", "true");
        self.core.emit_on(ctx, section.panel, inst, "shown");
    }

    fn collapse(&self, ctx: &mut Context, inst: InstanceRef, section: &Section) {
        if !self.core.emit_on(ctx, section.panel, inst, "hide") {
            return;
        }
        ctx.dom.remove_class(section.panel, CLASS_SHOW);
        ctx.dom.set_attr(section.header, "aria-expanded", "false");
        self.core.emit_on(ctx, section.panel, inst, "hidden");
    }
}

impl Lifecycle for Accordion {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::CLICK
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        for section in self.sections(ctx, inst.element) {
            let expanded = ctx.dom.has_class(section.panel, CLASS_SHOW);
            ctx.dom.set_attr(
                section.header,
                "aria-expanded",
                if expanded { "true" } else { "false" },
            );
        }
    }

    fn on_click(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) -> bool {
        let sections = self.sections(ctx, inst.element);
        let Some(clicked) = sections
            .iter()
            .position(|s| ctx.dom.contains(s.header, target))
        else {
            return false;
        };

        let opening = !ctx.dom.has_class(sections[clicked].panel, CLASS_SHOW);
        if opening {
            if !self.config.bool("multiple", false) {
                for (i, section) in sections.iter().enumerate() {
                    if i != clicked && ctx.dom.has_class(section.panel, CLASS_SHOW) {
                        self.collapse(ctx, inst, section);
                    }
                }
            }
            self.expand(ctx, inst, &sections[clicked]);
        } else {
            self.collapse(ctx, inst, &sections[clicked]);
        }
        true
    }

    fn destroy(&mut self, ctx: &mut Context, _inst: InstanceRef) {
        self.core.teardown(ctx);
    }
}
