pub mod uninstall;
