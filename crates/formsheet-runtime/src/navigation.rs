#![forbid(unsafe_code)]

//! Screen containers and back navigation.
//!
//! [`ScreenTree`] is an arena of containers and the screens they own. A
//! screen refers back to its container by id only; ownership flows from
//! container to screen. A container may itself be hosted by a screen of an
//! outer container, which is how nested stacks are expressed.
//!
//! # Invariants
//!
//! - A screen belongs to at most one container at a time.
//! - The hosting chain is acyclic: a container's root is never one of its
//!   own ancestors (guaranteed by construction, since a container can only
//!   be hosted by a screen that already exists).
//! - Dismissed screens leave the stack order immediately and are detached
//!   when the container finishes its appear transition.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use formsheet_core::StackPresentation;

use crate::behavior::ScreenRemoval;
use crate::transition::ContainerNotifier;

/// Identifier of a screen in a [`ScreenTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(u32);

/// Identifier of a container in a [`ScreenTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u32);

/// Kind of a screen container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Navigation stack; the first screen is its root.
    Stack,
    /// Any other container (tabs, plain screen containers).
    Plain,
}

/// Result of a dismissal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    /// The screen was dismissed by this call.
    Dismissed,
    /// The screen had already been dismissed; nothing changed.
    AlreadyDismissed,
}

/// Navigation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// The screen's container is not a stack.
    NotAStack(ScreenId),
    /// The screen is not attached to any container.
    Detached(ScreenId),
    /// No such screen.
    UnknownScreen(ScreenId),
    /// No such container.
    UnknownContainer(ContainerId),
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAStack(id) => write!(f, "screen {} added into a non-stack container", id.0),
            Self::Detached(id) => write!(f, "screen {} is not attached to a container", id.0),
            Self::UnknownScreen(id) => write!(f, "unknown screen {}", id.0),
            Self::UnknownContainer(id) => write!(f, "unknown container {}", id.0),
        }
    }
}

impl std::error::Error for NavigationError {}

#[derive(Debug)]
struct ContainerNode {
    kind: ContainerKind,
    screens: Vec<ScreenId>,
    dismissing: Vec<ScreenId>,
    host: Option<ScreenId>,
}

#[derive(Debug)]
struct ScreenNode {
    container: Option<ContainerId>,
    presentation: StackPresentation,
}

/// Arena of containers and screens.
#[derive(Debug, Default)]
pub struct ScreenTree {
    containers: Vec<ContainerNode>,
    screens: Vec<ScreenNode>,
}

impl ScreenTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level container.
    pub fn add_container(&mut self, kind: ContainerKind) -> ContainerId {
        self.insert_container(kind, None)
    }

    /// Add a container hosted by `host`, nesting it inside the host's container.
    pub fn add_nested_container(
        &mut self,
        kind: ContainerKind,
        host: ScreenId,
    ) -> Result<ContainerId, NavigationError> {
        self.screen(host)?;
        Ok(self.insert_container(kind, Some(host)))
    }

    fn insert_container(&mut self, kind: ContainerKind, host: Option<ScreenId>) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(ContainerNode {
            kind,
            screens: Vec::new(),
            dismissing: Vec::new(),
            host,
        });
        id
    }

    /// Push a new screen onto `container`.
    pub fn push_screen(
        &mut self,
        container: ContainerId,
        presentation: StackPresentation,
    ) -> Result<ScreenId, NavigationError> {
        self.container(container)?;
        let id = ScreenId(self.screens.len() as u32);
        self.screens.push(ScreenNode {
            container: Some(container),
            presentation,
        });
        self.containers[container.0 as usize].screens.push(id);
        Ok(id)
    }

    fn container(&self, id: ContainerId) -> Result<&ContainerNode, NavigationError> {
        self.containers
            .get(id.0 as usize)
            .ok_or(NavigationError::UnknownContainer(id))
    }

    fn screen(&self, id: ScreenId) -> Result<&ScreenNode, NavigationError> {
        self.screens
            .get(id.0 as usize)
            .ok_or(NavigationError::UnknownScreen(id))
    }

    /// Stack that owns `screen`, failing if it is not a stack.
    fn stack_of(&self, screen: ScreenId) -> Result<ContainerId, NavigationError> {
        let container = self
            .screen(screen)?
            .container
            .ok_or(NavigationError::Detached(screen))?;
        match self.container(container)?.kind {
            ContainerKind::Stack => Ok(container),
            ContainerKind::Plain => Err(NavigationError::NotAStack(screen)),
        }
    }

    /// Presentation of `screen`.
    pub fn presentation(&self, screen: ScreenId) -> Result<StackPresentation, NavigationError> {
        Ok(self.screen(screen)?.presentation)
    }

    /// Screens currently in `container`, root first.
    pub fn screens(&self, container: ContainerId) -> Result<&[ScreenId], NavigationError> {
        Ok(&self.container(container)?.screens)
    }

    /// Root screen of `container`.
    pub fn root(&self, container: ContainerId) -> Result<Option<ScreenId>, NavigationError> {
        Ok(self.container(container)?.screens.first().copied())
    }

    /// Container `screen` currently belongs to.
    pub fn container_of(&self, screen: ScreenId) -> Result<Option<ContainerId>, NavigationError> {
        Ok(self.screen(screen)?.container)
    }

    /// Whether the user can navigate back from `screen`.
    ///
    /// A non-root screen can always go back. A root screen defers to the
    /// stack screen hosting its container; a top-level root cannot.
    pub fn can_navigate_back(&self, screen: ScreenId) -> Result<bool, NavigationError> {
        let stack = self.stack_of(screen)?;
        let node = self.container(stack)?;
        if node.screens.first() != Some(&screen) {
            return Ok(true);
        }
        match node.host {
            Some(host) if self.is_in_stack(host) => self.can_navigate_back(host),
            _ => Ok(false),
        }
    }

    fn is_in_stack(&self, screen: ScreenId) -> bool {
        self.stack_of(screen).is_ok()
    }

    /// Dismiss `screen` from its stack.
    ///
    /// The screen leaves the stack order right away and is detached once the
    /// stack finishes its appear transition. Dismissing twice is a no-op.
    pub fn dismiss(&mut self, screen: ScreenId) -> Result<DismissOutcome, NavigationError> {
        if self.screen(screen)?.container.is_none() {
            return Ok(DismissOutcome::AlreadyDismissed);
        }
        let stack = self.stack_of(screen)?;
        let node = &mut self.containers[stack.0 as usize];
        let Some(index) = node.screens.iter().position(|s| *s == screen) else {
            return Ok(DismissOutcome::AlreadyDismissed);
        };
        node.screens.remove(index);
        node.dismissing.push(screen);
        tracing::info!(
            target: "formsheet.nav",
            screen = screen.0,
            container = stack.0,
            "screen dismissed from stack"
        );
        Ok(DismissOutcome::Dismissed)
    }

    /// Finish container bookkeeping after an appear transition ended.
    ///
    /// Returns the screens that were detached.
    pub fn finish_transition(
        &mut self,
        container: ContainerId,
    ) -> Result<Vec<ScreenId>, NavigationError> {
        self.container(container)?;
        let detached = std::mem::take(&mut self.containers[container.0 as usize].dismissing);
        for screen in &detached {
            self.screens[screen.0 as usize].container = None;
        }
        if !detached.is_empty() {
            tracing::debug!(
                target: "formsheet.nav",
                container = container.0,
                detached = detached.len(),
                "detached dismissed screens"
            );
        }
        Ok(detached)
    }
}

/// Shared handle to a [`ScreenTree`] scoped to one screen.
///
/// Used as the direct removal strategy of a sheet controller and as the
/// container notifier of a transition emitter.
#[derive(Debug, Clone)]
pub struct StackHandle {
    tree: Rc<RefCell<ScreenTree>>,
    screen: ScreenId,
}

impl StackHandle {
    /// Create a handle for `screen`.
    pub fn new(tree: Rc<RefCell<ScreenTree>>, screen: ScreenId) -> Self {
        Self { tree, screen }
    }

    /// Screen this handle acts for.
    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    /// Whether the screen can navigate back.
    pub fn can_navigate_back(&self) -> Result<bool, NavigationError> {
        self.tree.borrow().can_navigate_back(self.screen)
    }

    /// Dismiss the screen from its stack.
    pub fn dismiss_from_container(&self) -> Result<DismissOutcome, NavigationError> {
        self.tree.borrow_mut().dismiss(self.screen)
    }
}

impl ScreenRemoval for StackHandle {
    fn remove_screen(&mut self) -> Result<(), NavigationError> {
        self.dismiss_from_container().map(|_| ())
    }
}

impl ContainerNotifier for StackHandle {
    fn on_view_appear_transition_end(&mut self) {
        let mut tree = self.tree.borrow_mut();
        let container = match tree.container_of(self.screen) {
            Ok(Some(container)) => container,
            _ => return,
        };
        if let Err(err) = tree.finish_transition(container) {
            tracing::warn!(target: "formsheet.nav", error = %err, "transition bookkeeping failed");
        }
    }
}
