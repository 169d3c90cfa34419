//! Skeleton XML documents for freshly created Code::Blocks files.
//!
//! Placeholder attribute values (titles, outputs, file names) are replaced
//! when the templates are instantiated.

pub const PROJECT: &str = r#"
<CodeBlocks_project_file>
	<FileVersion major="1" minor="6" />
	<Project>
		<Option title="cprogram" />
		<Option pch_mode="2" />
		<Option compiler="gcc" />
		<Build>
		</Build>
	</Project>
</CodeBlocks_project_file>
"#;

pub const TARGET: &str = r#"
<Target title="Debug">
	<Option output="bin/Debug/cprogram" prefix_auto="1" extension_auto="1" />
	<Option object_output="obj/Debug/" />
	<Option type="1" />
	<Option compiler="gcc" />
	<Compiler>
	</Compiler>
</Target>
"#;

pub const UNIT: &str = r#"
<Unit filename="main.c">
	<Option compilerVar="CC" />
</Unit>
"#;

pub const EXTENSIONS: &str = r#"
<Extensions>
	<code_completion />
	<debugger />
</Extensions>
"#;

pub const WORKSPACE: &str = r#"
<CodeBlocks_workspace_file>
	<Workspace title="Workspace">
	</Workspace>
</CodeBlocks_workspace_file>
"#;
