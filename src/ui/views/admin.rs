//! Administración de alumnos, ubicaciones y tipos de incidencia

use egui::{self, RichText};

use crate::models::Student;
use crate::services::{AppContext, LegacyImporter};
use crate::store::Collection;
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AdminTab {
    #[default]
    Students,
    Locations,
    IncidentTypes,
}

/// Datos del formulario de alumno
#[derive(Debug, Default, Clone)]
struct StudentFormData {
    /// Nombre original cuando se edita
    editing: Option<String>,
    name: String,
    guardian: String,
    grade: String,
    group: String,
}

impl StudentFormData {
    fn from_student(student: &Student) -> Self {
        Self {
            editing: Some(student.name.clone()),
            name: student.name.clone(),
            guardian: student.guardian.clone(),
            grade: student.grade.clone(),
            group: student.group.clone(),
        }
    }

    fn to_student(&self) -> Student {
        Student::new(self.name.trim(), self.guardian.trim()).with_class(self.grade.trim(), self.group.trim())
    }
}

pub struct AdminView {
    tab: AdminTab,
    student_form: StudentFormData,
    new_entry: String,
    renaming: Option<(String, String)>,
}

impl Default for AdminView {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminView {
    pub fn new() -> Self {
        Self {
            tab: AdminTab::default(),
            student_form: StudentFormData::default(),
            new_entry: String::new(),
            renaming: None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &mut AppContext) {
        ui.horizontal(|ui| {
            ui.heading(format!("{} Administración", Icons::ADMIN));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(format!("{} Importar carpeta recursos", Icons::IMPORT))
                    .on_hover_text("students.txt, locations.txt, tipoIncidencia.txt")
                    .clicked()
                {
                    self.import_legacy(state, app);
                }
            });
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let tabs = [
                (AdminTab::Students, format!("{} Alumnos", Icons::STUDENT)),
                (AdminTab::Locations, format!("{} Ubicaciones", Icons::LOCATION)),
                (AdminTab::IncidentTypes, format!("{} Tipos de incidencia", Icons::TYPE)),
            ];
            for (tab, label) in tabs {
                if ui.selectable_label(self.tab == tab, label).clicked() && self.tab != tab {
                    self.tab = tab;
                    self.new_entry.clear();
                    self.renaming = None;
                }
            }
        });
        ui.separator();

        match self.tab {
            AdminTab::Students => self.show_students(ui, state, app),
            AdminTab::Locations => self.show_catalog(ui, state, app, Collection::Locations),
            AdminTab::IncidentTypes => self.show_catalog(ui, state, app, Collection::IncidentTypes),
        }
    }

    fn show_students(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &mut AppContext) {
        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            let students = app.cache().students.clone();
            ui.label(RichText::new(format!("{} alumnos", students.len())).color(Colors::TEXT_SECONDARY));

            egui::ScrollArea::vertical().id_salt("admin_students").show(ui, |ui| {
                for student in &students {
                    ui.horizontal(|ui| {
                        if ui.small_button(Icons::EDIT).on_hover_text("Editar").clicked() {
                            self.student_form = StudentFormData::from_student(student);
                        }
                        if ui.small_button(Icons::DELETE).on_hover_text("Borrar").clicked() {
                            state.show_confirm(
                                &format!("¿Borrar al alumno '{}'?", student.name),
                                ConfirmAction::DeleteStudent(student.name.clone()),
                            );
                        }
                        ui.label(&student.name);
                        let detail = format!("{} · {}", student.guardian_or_default(), student.class_label());
                        ui.label(RichText::new(detail).small().color(Colors::TEXT_MUTED));
                    });
                }
            });

            self.show_student_form(&mut columns[1], state, app);
        });
    }

    fn show_student_form(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &mut AppContext) {
        let title = match self.student_form.editing {
            Some(_) => "Editar alumno",
            None => "Nuevo alumno",
        };
        ui.label(RichText::new(title).strong());
        ui.add_space(4.0);

        egui::Grid::new("student_form").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            ui.label("Nombre:");
            ui.text_edit_singleline(&mut self.student_form.name);
            ui.end_row();

            ui.label("Padre/Madre:");
            ui.text_edit_singleline(&mut self.student_form.guardian);
            ui.end_row();

            ui.label("Grado:");
            ui.text_edit_singleline(&mut self.student_form.grade);
            ui.end_row();

            ui.label("Grupo:");
            ui.text_edit_singleline(&mut self.student_form.group);
            ui.end_row();
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button(format!("{} Guardar", Icons::SAVE)).clicked() {
                let student = self.student_form.to_student();
                let editing = self.student_form.editing.clone();
                let result = app.update_resources(|store| match &editing {
                    Some(original) => store.students().update(original, student),
                    None => store.students().create(student),
                });
                match result {
                    Ok(()) => {
                        state.resources_changed = true;
                        state.show_success("Alumno guardado");
                        self.student_form = StudentFormData::default();
                    }
                    Err(e) => state.show_failure(&e),
                }
            }
            if ui.button("Cancelar").clicked() {
                self.student_form = StudentFormData::default();
            }
        });
    }

    fn show_catalog(&mut self, ui: &mut egui::Ui, state: &mut AppState, app: &mut AppContext, collection: Collection) {
        let entries = match collection {
            Collection::Locations => app.cache().locations.clone(),
            _ => app.cache().incident_types.clone(),
        };

        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.new_entry).hint_text("Nuevo..."));
            if ui.button(format!("{} Agregar", Icons::ADD)).clicked() {
                let entry = self.new_entry.clone();
                let result = app.update_resources(|store| catalog(store, collection).add(&entry));
                match result {
                    Ok(()) => {
                        state.resources_changed = true;
                        state.show_success(&format!("Agregado a {}", collection.label()));
                        self.new_entry.clear();
                    }
                    Err(e) => state.show_failure(&e),
                }
            }
        });
        ui.add_space(8.0);

        egui::ScrollArea::vertical().id_salt("admin_catalog").show(ui, |ui| {
            for entry in &entries {
                ui.horizontal(|ui| {
                    let editing_this = matches!(&self.renaming, Some((old, _)) if old == entry);
                    if editing_this {
                        let mut commit = false;
                        if let Some((_, new)) = self.renaming.as_mut() {
                            ui.text_edit_singleline(new);
                            commit = ui.button(Icons::SAVE).clicked();
                        }
                        if ui.button("Cancelar").clicked() {
                            self.renaming = None;
                        } else if commit {
                            if let Some((old, new)) = self.renaming.take() {
                                let result = app.update_resources(|store| catalog(store, collection).rename(&old, &new));
                                match result {
                                    Ok(()) => {
                                        state.resources_changed = true;
                                        state.show_success("Renombrado");
                                    }
                                    Err(e) => state.show_failure(&e),
                                }
                            }
                        }
                    } else {
                        if ui.small_button(Icons::EDIT).clicked() {
                            self.renaming = Some((entry.clone(), entry.clone()));
                        }
                        if ui.small_button(Icons::DELETE).clicked() {
                            let action = match collection {
                                Collection::Locations => ConfirmAction::DeleteLocation(entry.clone()),
                                _ => ConfirmAction::DeleteIncidentType(entry.clone()),
                            };
                            state.show_confirm(&format!("¿Borrar '{}'?", entry), action);
                        }
                        ui.label(entry);
                    }
                });
            }
        });
    }

    fn import_legacy(&mut self, state: &mut AppState, app: &mut AppContext) {
        let Some(dir) = rfd::FileDialog::new()
            .set_title("Carpeta con students.txt, locations.txt y tipoIncidencia.txt")
            .pick_folder()
        else {
            return;
        };

        let result = LegacyImporter::new(app.store()).import_dir(&dir);
        app.reload();
        state.resources_changed = true;

        match result {
            Ok(result) => {
                if result.warnings.is_empty() {
                    state.show_success(&result.summary());
                } else {
                    state.show_warning(&format!("{}. {}", result.summary(), result.warnings.join(". ")));
                }
            }
            Err(e) => state.show_error(&format!("Importación fallida: {:#}", e)),
        }
    }
}

fn catalog(store: &crate::store::ResourceStore, collection: Collection) -> crate::store::CatalogRepository<'_> {
    match collection {
        Collection::Locations => store.locations(),
        _ => store.incident_types(),
    }
}
