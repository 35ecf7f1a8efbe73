//! Session guard module.
//!
//! This module contains the scoped owner of a [`Session`]: the
//! session is opened by [`SessionGuard::open`] and released when the
//! guard is dropped, on every exit path.

use log::{debug, warn};
use std::ops::{Deref, DerefMut};

use crate::backend::{Connect, Result, Session};

pub struct SessionGuard<S: Session> {
    session: S,
    selected: Option<String>,
}

impl<S: Session> SessionGuard<S> {
    pub fn open<C>(connector: &C) -> Result<Self>
    where
        C: Connect<Session = S>,
    {
        let session = connector.connect()?;
        debug!("session opened");

        Ok(Self {
            session,
            selected: None,
        })
    }

    /// Selects the given folder. The folder is closed before logging
    /// out.
    pub fn select(&mut self, folder: &str) -> Result<()> {
        debug!("selecting folder {}", folder);
        self.session.select_folder(folder)?;
        self.selected = Some(folder.to_owned());
        Ok(())
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

impl<S: Session> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl<S: Session> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

impl<S: Session> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Some(folder) = self.selected.take() {
            if let Err(err) = self.session.close() {
                warn!("cannot close folder {}: {}", folder, err);
            }
        }

        if let Err(err) = self.session.logout() {
            warn!("cannot logout: {}", err);
        }

        debug!("session released");
    }
}
