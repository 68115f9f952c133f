pub mod skins;
