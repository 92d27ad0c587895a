use colonnade_config::Struts;
use smithay::utils::{Logical, Rectangle};

/// Shrinks the output area by the struts, never below zero size.
pub fn compute_working_area(
    area: Rectangle<i32, Logical>,
    struts: Struts,
) -> Rectangle<i32, Logical> {
    let left = struts.left.round();
    let right = struts.right.round();
    let top = struts.top.round();
    let bottom = struts.bottom.round();

    let w = (area.size.w - left - right).max(0);
    let h = (area.size.h - top - bottom).max(0);

    Rectangle::from_loc_and_size((area.loc.x + left, area.loc.y + top), (w, h))
}

/// Rectangle built from raw coordinates, with negative sizes clamped to zero.
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
    Rectangle::from_loc_and_size((x, y), (w.max(0), h.max(0)))
}
