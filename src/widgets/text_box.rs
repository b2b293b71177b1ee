//! Single-value text boxes.
use crate::coordinate::{Coordinate, WidgetHash};
use crate::ecosystem::EcosystemWidget;
use crate::engine::Walker;
use crate::guard::Superseded;
use crate::types::Widget;

use super::{Dispatch, anchor};

/// A text box only has its own anchor. With `.value` requested, the anchor
/// also carries the text: from the section info for the ecosystem objectives,
/// from the widget payload otherwise.
pub(crate) async fn resolve(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, is_issues: bool) -> Result<Dispatch, Superseded> {
    let own = anchor(at, &widget.name);
    if !walker.options.value_requested {
        return Ok(Dispatch::hash(own, 0));
    }

    let value = if is_issues {
        let key = EcosystemWidget::Objectives.property();
        walker.section_info(at).await?.and_then(|info| info.text_field(&key).map(str::to_owned))
    } else {
        walker.text_box(at, widget).await?.map(|data| data.text)
    };

    Ok(Dispatch::hash(WidgetHash { value, ..own }, 0))
}
