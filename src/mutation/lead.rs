use super::keyed::{self, Direction, KeyedList};
use crate::ids;
use crate::model::{Definition, KanbanStage, LeadSummaryField, SourceOption};

/// `lead_summary.fields`
pub struct LeadFields;

/// `lead_summary.source_options`
pub struct SourceOptions;

/// `lead_kanban.stages`
pub struct KanbanStages;

impl KeyedList for LeadFields {
    type Entry = LeadSummaryField;

    fn entries(def: &Definition) -> &[LeadSummaryField] {
        def.lead_summary
            .as_ref()
            .map(|s| s.fields.as_slice())
            .unwrap_or_default()
    }

    fn store(def: &mut Definition, entries: Vec<LeadSummaryField>) {
        def.lead_summary.get_or_insert_default().fields = entries;
    }

    fn fresh(def: &Definition) -> LeadSummaryField {
        let key = ids::sequential_key("campo", Self::entries(def).iter().map(|f| f.key.as_str()));
        LeadSummaryField {
            label: "Novo campo".to_string(),
            source: key.clone(),
            key,
            empty_value: None,
        }
    }
}

impl KeyedList for SourceOptions {
    type Entry = SourceOption;

    fn entries(def: &Definition) -> &[SourceOption] {
        def.lead_summary
            .as_ref()
            .and_then(|s| s.source_options.as_deref())
            .unwrap_or_default()
    }

    fn store(def: &mut Definition, entries: Vec<SourceOption>) {
        def.lead_summary.get_or_insert_default().source_options = Some(entries);
    }

    fn fresh(def: &Definition) -> SourceOption {
        SourceOption {
            value: ids::sequential_key("opcao", Self::entries(def).iter().map(|o| o.value.as_str())),
            label: "Nova opção".to_string(),
        }
    }
}

impl KeyedList for KanbanStages {
    type Entry = KanbanStage;

    fn entries(def: &Definition) -> &[KanbanStage] {
        def.lead_kanban
            .as_ref()
            .map(|k| k.stages.as_slice())
            .unwrap_or_default()
    }

    fn store(def: &mut Definition, entries: Vec<KanbanStage>) {
        def.lead_kanban.get_or_insert_default().stages = entries;
    }

    /// Takes the first node id not yet used as a stage id.
    fn fresh(def: &Definition) -> KanbanStage {
        let id = ids::first_unused_node_id(def, Self::entries(def).iter().map(|s| s.id.as_str()));
        KanbanStage {
            label: id.clone(),
            id,
        }
    }
}

/// Generates the named update/add/remove/move operations for each keyed list.
macro_rules! define_keyed_list_ops {
    ( $( ($list:ty, $entry:ty, $update:ident, $add:ident, $remove:ident, $move_fn:ident) ),* $(,)? ) => {
        $(
            pub fn $update(def: &Definition, index: usize, entry: $entry) -> Definition {
                keyed::update_entry::<$list>(def, index, entry)
            }

            pub fn $add(def: &Definition) -> Definition {
                keyed::add_entry::<$list>(def)
            }

            pub fn $remove(def: &Definition, index: usize) -> Definition {
                keyed::remove_entry::<$list>(def, index)
            }

            pub fn $move_fn(def: &Definition, index: usize, direction: Direction) -> Definition {
                keyed::move_entry::<$list>(def, index, direction.offset())
            }
        )*
    };
}

define_keyed_list_ops! {
    (LeadFields, LeadSummaryField, update_lead_field, add_lead_field, remove_lead_field, move_lead_field),
    (SourceOptions, SourceOption, update_source_option, add_source_option, remove_source_option, move_source_option),
    (KanbanStages, KanbanStage, update_lead_kanban_stage, add_lead_kanban_stage, remove_lead_kanban_stage, move_lead_kanban_stage),
}
