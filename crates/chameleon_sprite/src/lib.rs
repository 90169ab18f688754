/*!
Combines SVG icons into a sprite where each color and stroke width can be restyled with CSS
variables.

Each distinct `fill`, `stroke`, or `stroke-width` value within an icon is replaced with a
reference like `var(--svg-custom-color-1, var(--svg-custom-color, #000))`. A page can then
restyle a single value of one icon, every icon, or neither.

# Example

```
use chameleon_sprite::{
    compose::{Composer, Icon},
    options::Options,
    variablize::Variablizer,
};
use chameleon_ast::serialize::Serialize;

let icon = Icon::parse(
    "dot",
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 2 2"><circle r="1" fill="red"/></svg>"#,
).unwrap();
let mut sprite = Composer::default().compose(vec![icon]).unwrap();

let options = Options::default();
let report = Variablizer::new(&options).run_document(&mut sprite);
assert_eq!(report.colors, 1);
assert!(sprite.serialize().unwrap().contains(
    r#"fill="var(--svg-custom-color-1, var(--svg-custom-color, red))""#
));
```
*/
pub mod compose;
pub mod inline_styles;
pub mod options;
pub mod prefix_ids;
pub mod registry;
pub mod variablize;

pub use crate::{
    compose::{ComposeError, Composer, Icon},
    options::Options,
    variablize::{Report, Variablizer},
};

#[cfg(test)]
#[ctor::ctor]
fn init_test() {
    let _ = env_logger::builder().is_test(true).try_init();
}
