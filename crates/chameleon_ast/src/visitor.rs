//! A pre-order walk over an element tree, for visiting or transforming each node.
use crate::{element::Element, node::Node};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Information about where the visited node sits in the tree
pub struct Context {
    /// The number of ancestors between the node and the element the walk started from.
    ///
    /// The starting element has a depth of `0`.
    pub depth: usize,
}

impl Context {
    fn child(self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }
}

enum Pending<'a> {
    Element(&'a mut Element, Context),
    Node(&'a mut Node, Context),
}

/// A trait for visiting or transforming the tree
#[allow(unused_variables)]
pub trait Visitor {
    /// The error returned when the visitor fails
    type Error;

    /// Visits an element, before any of it's children.
    ///
    /// Changes made to the element's children will be reflected in the rest of the walk.
    ///
    /// # Errors
    /// Whether the visitor fails
    fn element(&mut self, element: &mut Element, context: &Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Visits a text or cdata node
    ///
    /// # Errors
    /// Whether the visitor fails
    fn text_or_cdata(&mut self, node: &mut Node, context: &Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Visits a comment
    ///
    /// # Errors
    /// Whether the visitor fails
    fn comment(&mut self, comment: &mut Node, context: &Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Visits a processing instruction
    ///
    /// # Errors
    /// Whether the visitor fails
    fn processing_instruction(
        &mut self,
        processing_instruction: &mut Node,
        context: &Context,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Visits the root and each of it's descendants in document order.
    ///
    /// The walk keeps it's own stack, so the depth of the tree isn't limited by the call stack.
    ///
    /// # Errors
    /// If any of the visitor's methods fail
    fn start(&mut self, root: &mut Element) -> Result<(), Self::Error> {
        let mut stack = vec![Pending::Element(root, Context::default())];
        while let Some(pending) = stack.pop() {
            match pending {
                Pending::Element(element, context) => {
                    log::debug!("visiting <{}> at depth {}", element.name, context.depth);
                    self.element(element, &context)?;
                    let child_context = context.child();
                    stack.extend(element.children.iter_mut().rev().map(|child| match child {
                        Node::Element(element) => Pending::Element(element, child_context),
                        node => Pending::Node(node, child_context),
                    }));
                }
                Pending::Node(node, context) => match node {
                    Node::Text(_) | Node::CData(_) => self.text_or_cdata(node, &context)?,
                    Node::Comment(_) => self.comment(node, &context)?,
                    Node::ProcessingInstruction { .. } => {
                        self.processing_instruction(node, &context)?;
                    }
                    Node::Element(_) => {}
                },
            }
        }
        Ok(())
    }
}
